//! Sans-IO websocket protocol engine.
//!
//! Implements the websocket wire protocol
//! ([RFC-6455](https://datatracker.ietf.org/doc/html/rfc6455))
//! layered over HTTP/1.1, symmetric between client and server.
//! The crate performs no socket I/O: raw bytes come in through
//! `on_read`, encoded bytes go out through an injected write sink,
//! and the transport is torn down through an injected closer.
//!
//! ## High-level API
//!
//! - [`proto`]
//!
//! ```ignore
//! {
//!     let mut client = ClientProtocol::new(callback, "/chat", Some("example.com".into()), writer, closer);
//!
//!     // issue the upgrade request
//!     client.on_connect();
//!
//!     // feed bytes from the transport, any chunk size
//!     client.on_read(&buf);
//!
//!     // send a message once upgraded
//!     client.send_text("hello")?;
//! }
//! ```
//!
//! ## Low-level API
//!
//! - [`frame`]
//! - [`http`]
//! - [`handshake`]
//!
//! Frame:
//!
//! ```ignore
//! {
//!     // encode a frame, masked
//!     let bytes = Frame::text("hi").encode(Mask::Key(new_mask_key()));
//!
//!     // decode frames incrementally
//!     let mut parser = FrameParser::new();
//!     while let Some(frame) = parser.parse_chunk(&bytes)? { ... }
//! }
//! ```

pub mod error;
pub mod buffer;
pub mod http;
pub mod frame;
pub mod handshake;
pub mod proto;
