//! Close status codes and close-payload codec.
//!
//! A close payload is a 2-byte big-endian status code optionally
//! followed by a UTF-8 reason string.
//! [RFC-6455 Section 7.4](https://datatracker.ietf.org/doc/html/rfc6455#section-7.4)

/// 1000, normal closure
pub const NORMAL: u16 = 1000;

/// 1001, endpoint going away
pub const GOING_AWAY: u16 = 1001;

/// 1002, protocol error
pub const PROTOCOL_ERROR: u16 = 1002;

/// 1003, unacceptable data type
pub const UNKNOWN_DATA: u16 = 1003;

/// 1005, reserved: no status code supplied
pub const NO_STATUS: u16 = 1005;

/// 1006, reserved: transport vanished without a close frame
pub const ABNORMAL: u16 = 1006;

/// 1007, non-UTF-8 text payload
pub const BAD_TEXT: u16 = 1007;

/// 1008, policy violation
pub const POLICY_VIOLATION: u16 = 1008;

/// 1009, message too big
pub const MESSAGE_TOO_BIG: u16 = 1009;

/// 1011, unexpected server condition
pub const UNEXPECTED_CONDITION: u16 = 1011;

/// Encode a status code and reason into a close payload.
pub fn encode(code: u16, reason: &str) -> Vec<u8> {
    let mut payload = Vec::with_capacity(2 + reason.len());
    payload.extend_from_slice(&code.to_be_bytes());
    payload.extend_from_slice(reason.as_bytes());
    payload
}

/// Decode a close payload into a status code and reason.
///
/// A payload shorter than 2 bytes carries no status ([`NO_STATUS`]),
/// exactly 2 bytes carries no reason.
pub fn decode(payload: &[u8]) -> (u16, String) {
    if payload.len() < 2 {
        return (NO_STATUS, String::new());
    }

    let code = u16::from_be_bytes([payload[0], payload[1]]);
    let reason = String::from_utf8_lossy(&payload[2..]).into_owned();
    (code, reason)
}
