//! Websocket handshake.
//!
//! The HTTP Upgrade exchange that promotes a connection from HTTP
//! mode to websocket mode.
//! [RFC-6455 Section 4](https://datatracker.ietf.org/doc/html/rfc6455#section-4)

pub mod key;

pub use key::{new_sec_key, accept_key};

/// 258EAFA5-E914-47DA-95CA-C5AB0DC85B11
pub const GUID: &[u8] = b"258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// 13
pub const WEBSOCKET_VERSION: &str = "13";

/// Upgrade
pub const HEADER_UPGRADE: &str = "Upgrade";

/// Connection
pub const HEADER_CONNECTION: &str = "Connection";

/// Host
pub const HEADER_HOST: &str = "Host";

/// Sec-WebSocket-Key
pub const HEADER_SEC_KEY: &str = "Sec-WebSocket-Key";

/// Sec-WebSocket-Accept
pub const HEADER_SEC_ACCEPT: &str = "Sec-WebSocket-Accept";

/// Sec-WebSocket-Version
pub const HEADER_SEC_VERSION: &str = "Sec-WebSocket-Version";

/// websocket
pub const UPGRADE_VALUE: &str = "websocket";

/// Upgrade
pub const CONNECTION_VALUE: &str = "Upgrade";
