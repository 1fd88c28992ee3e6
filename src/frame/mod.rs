//! Websocket data frame.
//!
//! [RFC-6455 Section5](https://datatracker.ietf.org/doc/html/rfc6455#section-5)
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
//! |I|S|S|S|  (4)  |A|     (7)     |             (16/64)           |
//! |N|V|V|V|       |S|             |   (if payload len==126/127)   |
//! | |1|2|3|       |K|             |                               |
//! +-+-+-+-+-------+-+-------------+ - - - - - - - - - - - - - - - +
//! |     Extended payload length continued, if payload len == 127  |
//! + - - - - - - - - - - - - - - - +-------------------------------+
//! |                               |Masking-key, if MASK set to 1  |
//! +-------------------------------+-------------------------------+
//! | Masking-key (continued)       |          Payload Data         |
//! +-------------------------------- - - - - - - - - - - - - - - - +
//! :                     Payload Data continued ...                :
//! + - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - +
//! |                     Payload Data continued ...                |
//! +---------------------------------------------------------------+
//! ```
//!
//! [`Frame`] is an application-level message: continuation frames are
//! assembled by the parser and never appear here.

pub mod flag;
pub mod length;
pub mod mask;
pub mod close;
pub mod parser;

pub use flag::{Fin, OpCode};
pub use length::PayloadLen;
pub use mask::{Mask, new_mask_key, apply_mask, apply_mask4};
pub use parser::FrameParser;

/// One application-level websocket message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: OpCode,
    pub payload: Vec<u8>,
}

impl Frame {
    /// Constructor.
    #[inline]
    pub const fn new(opcode: OpCode, payload: Vec<u8>) -> Self { Self { opcode, payload } }

    /// A text frame.
    #[inline]
    pub fn text(text: &str) -> Self { Self::new(OpCode::Text, text.as_bytes().to_vec()) }

    /// A binary frame.
    #[inline]
    pub fn binary(data: Vec<u8>) -> Self { Self::new(OpCode::Binary, data) }

    /// A ping frame.
    #[inline]
    pub fn ping(data: Vec<u8>) -> Self { Self::new(OpCode::Ping, data) }

    /// A pong frame.
    #[inline]
    pub fn pong(data: Vec<u8>) -> Self { Self::new(OpCode::Pong, data) }

    /// A close frame carrying a status code and reason.
    #[inline]
    pub fn close(code: u16, reason: &str) -> Self {
        Self::new(OpCode::Close, close::encode(code, reason))
    }

    /// Encode as a single wire frame with `fin` set.
    pub fn encode(&self, mask: Mask) -> Vec<u8> {
        encode_part(Fin::Y, self.opcode, mask, &self.payload)
    }

    /// Encode as a sequence of wire frames of at most `fragment_size`
    /// payload bytes each.
    ///
    /// Every chunk after the first is re-opcoded as a continuation, only
    /// the last sets `fin`. An empty payload still yields one final frame.
    pub fn encode_fragmented(&self, mask: Mask, fragment_size: usize) -> Vec<Vec<u8>> {
        let fragment_size = fragment_size.max(1);

        if self.payload.is_empty() {
            return vec![self.encode(mask)];
        }

        let mut fragments = Vec::with_capacity(self.payload.len().div_ceil(fragment_size));
        for (i, chunk) in self.payload.chunks(fragment_size).enumerate() {
            let opcode = if i == 0 { self.opcode } else { OpCode::Continue };
            let fin = if chunk.len() == self.payload.len() - i * fragment_size {
                Fin::Y
            } else {
                Fin::N
            };
            fragments.push(encode_part(fin, opcode, mask, chunk));
        }
        fragments
    }
}

/// Encode one wire frame.
fn encode_part(fin: Fin, opcode: OpCode, mask: Mask, payload: &[u8]) -> Vec<u8> {
    let length = PayloadLen::from_num(payload.len() as u64);

    let head_len = 2 + length.extended_len() + if mask.to_flag() != 0 { 4 } else { 0 };
    let mut out = Vec::with_capacity(head_len + payload.len());

    // fin, opcode
    out.push(fin as u8 | opcode.to_wire());

    // mask, payload length
    out.push(mask.to_flag() | length.to_flag());

    // extended payload length
    match length {
        PayloadLen::Standard(_) => {}
        PayloadLen::Extended1(v) => out.extend_from_slice(&v.to_be_bytes()),
        PayloadLen::Extended2(v) => out.extend_from_slice(&v.to_be_bytes()),
    };

    // mask key, then payload
    match mask {
        Mask::Key(key) => {
            out.extend_from_slice(&key);
            let data_at = out.len();
            out.extend_from_slice(payload);
            apply_mask4(key, &mut out[data_at..]);
        }
        Mask::None => out.extend_from_slice(payload),
    };

    out
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse_all(chunks: &[Vec<u8>]) -> Vec<Frame> {
        let mut parser = FrameParser::new();
        let mut out = Vec::new();
        for chunk in chunks {
            let mut chunk = &chunk[..];
            while let Some(frame) = parser.parse_chunk(chunk).unwrap() {
                out.push(frame);
                chunk = &[];
            }
        }
        out
    }

    #[test]
    fn encode_decode() {
        for len in [0, 1, 125, 126, 65535, 65536, 100000] {
            let frame = Frame::binary((0..len).map(|i| i as u8).collect());

            for mask in [Mask::None, Mask::Key(new_mask_key())] {
                let parsed = parse_all(&[frame.encode(mask)]);
                assert_eq!(parsed, [frame.clone()]);
            }
        }
    }

    #[test]
    fn encode_decode_fragmented() {
        let frame = Frame::text(&"0123456789".repeat(100));

        for fragment_size in [1, 3, 125, 999, 1000, 4096] {
            for mask in [Mask::None, Mask::Key(new_mask_key())] {
                let chunks = frame.encode_fragmented(mask, fragment_size);
                assert_eq!(chunks.len(), 1000_usize.div_ceil(fragment_size));

                let parsed = parse_all(&chunks);
                assert_eq!(parsed, [frame.clone()]);
            }
        }
    }

    #[test]
    fn fragment_empty_payload() {
        let frame = Frame::binary(Vec::new());
        let chunks = frame.encode_fragmented(Mask::None, 16);
        assert_eq!(chunks.len(), 1);
        assert_eq!(parse_all(&chunks), [frame]);
    }

    #[test]
    fn fragment_wire_layout() {
        let frame = Frame::text("abcdef");
        let chunks = frame.encode_fragmented(Mask::None, 4);
        assert_eq!(chunks.len(), 2);

        // first: fin clear, text opcode
        assert_eq!(chunks[0], vec![0x01, 0x04, b'a', b'b', b'c', b'd']);
        // last: fin set, continuation opcode
        assert_eq!(chunks[1], vec![0x80, 0x02, b'e', b'f']);
    }
}
