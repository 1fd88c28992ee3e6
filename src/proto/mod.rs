//! Protocol state machines.
//!
//! A connection starts in HTTP mode, performs the upgrade handshake and
//! switches to websocket mode exactly once. [`ClientProtocol`] drives the
//! requesting half, [`ServerProtocol`] the accepting half; both own the
//! incremental parsers and dispatch decoded frames to a [`Callback`].
//!
//! No I/O happens here: encoded bytes leave through an injected
//! [`WriteFn`] and the transport is torn down through an injected
//! [`CloseFn`]. All dispatch is synchronous within the caller's stack.

pub mod client;
pub mod server;

pub use client::{ClientCallback, ClientProtocol};
pub use server::{ServerCallback, ServerProtocol};

use crate::error::ProtoError;
use crate::frame::{Frame, FrameParser, Mask, OpCode, close, new_mask_key};
use crate::http::{HttpParser, HttpRequest, HttpResponse};

/// Write sink: receives the encoded bytes of one frame/message per call.
pub type WriteFn = Box<dyn FnMut(&[u8])>;

/// Close signal: tear down the transport now.
pub type CloseFn = Box<dyn FnMut()>;

/// Connection mode. The HTTP to websocket transition is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Http,
    Websocket,
}

/// Connection event callbacks.
///
/// All methods default to no-ops, implement only what you need.
/// Every callback receives the [`Conn`] so it can reply in place.
pub trait Callback {
    fn on_connect(&mut self, _conn: &mut Conn) {}

    fn on_disconnect(&mut self, _conn: &mut Conn, _code: u16, _reason: &str) {}

    fn on_text(&mut self, _conn: &mut Conn, _text: &str) {}

    fn on_binary(&mut self, _conn: &mut Conn, _data: &[u8]) {}

    fn on_ping(&mut self, _conn: &mut Conn, _data: &[u8]) {}

    fn on_pong(&mut self, _conn: &mut Conn, _data: &[u8]) {}
}

/// The sending half of a connection, handed to every callback.
///
/// Sends are checked against the current mode: websocket frames cannot
/// leave during the handshake and HTTP messages cannot leave after it.
pub struct Conn {
    writer: WriteFn,
    closer: CloseFn,
    mode: Mode,
    closing: bool,
    masked: bool,
    pending_disconnect: Option<(u16, String)>,
}

impl Conn {
    fn new(masked: bool, writer: WriteFn, closer: CloseFn) -> Self {
        Self {
            writer,
            closer,
            mode: Mode::Http,
            closing: false,
            masked,
            pending_disconnect: None,
        }
    }

    /// Current mode.
    #[inline]
    pub fn mode(&self) -> Mode { self.mode }

    /// Whether a close frame has been sent or received.
    #[inline]
    pub fn is_closing(&self) -> bool { self.closing }

    /// Send a websocket frame.
    ///
    /// The first close frame sent marks the connection as closing and
    /// schedules the disconnect notification with the code and reason
    /// decoded from its payload.
    pub fn send_frame(&mut self, frame: &Frame) -> Result<(), ProtoError> {
        if self.mode != Mode::Websocket {
            return Err(ProtoError::FrameInHttpMode);
        }

        let now_closing = !self.closing && frame.opcode == OpCode::Close;
        if now_closing {
            self.closing = true;
        }

        let data = frame.encode(self.write_mask());
        (self.writer)(&data);

        if now_closing {
            let (code, reason) = close::decode(&frame.payload);
            self.pending_disconnect = Some((code, reason));
        }
        Ok(())
    }

    /// Send a text frame.
    #[inline]
    pub fn send_text(&mut self, text: &str) -> Result<(), ProtoError> {
        self.send_frame(&Frame::text(text))
    }

    /// Send a binary frame.
    #[inline]
    pub fn send_binary(&mut self, data: &[u8]) -> Result<(), ProtoError> {
        self.send_frame(&Frame::binary(data.to_vec()))
    }

    /// Send a ping frame.
    #[inline]
    pub fn send_ping(&mut self, data: &[u8]) -> Result<(), ProtoError> {
        self.send_frame(&Frame::ping(data.to_vec()))
    }

    /// Send a pong frame.
    #[inline]
    pub fn send_pong(&mut self, data: &[u8]) -> Result<(), ProtoError> {
        self.send_frame(&Frame::pong(data.to_vec()))
    }

    /// Start (or answer) the close handshake.
    #[inline]
    pub fn send_close(&mut self, code: u16, reason: &str) -> Result<(), ProtoError> {
        self.send_frame(&Frame::close(code, reason))
    }

    /// Send an HTTP request. Only valid before the upgrade.
    pub fn send_request(&mut self, request: &HttpRequest) -> Result<(), ProtoError> {
        if self.mode == Mode::Websocket {
            return Err(ProtoError::HttpInWebsocketMode);
        }
        (self.writer)(&request.encode());
        Ok(())
    }

    /// Send an HTTP response. Only valid before the upgrade.
    pub fn send_response(&mut self, response: &HttpResponse) -> Result<(), ProtoError> {
        if self.mode == Mode::Websocket {
            return Err(ProtoError::HttpInWebsocketMode);
        }
        (self.writer)(&response.encode());
        Ok(())
    }

    /// Tell the transport to go away.
    pub(crate) fn close_transport(&mut self) { (self.closer)() }

    /// Clients mask every outbound frame with a fresh key.
    #[inline]
    fn write_mask(&self) -> Mask {
        if self.masked {
            Mask::Key(new_mask_key())
        } else {
            Mask::None
        }
    }
}

impl std::fmt::Debug for Conn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conn")
            .field("mode", &self.mode)
            .field("closing", &self.closing)
            .field("masked", &self.masked)
            .finish_non_exhaustive()
    }
}

/// Role-independent engine half: parsers, connection, callback and the
/// websocket-mode frame rules. The client/server wrappers add the
/// HTTP-mode handshake logic.
pub(crate) struct Protocol<C> {
    pub(crate) http: HttpParser,
    pub(crate) ws: FrameParser,
    pub(crate) conn: Conn,
    pub(crate) callback: C,
}

impl<C: Callback> Protocol<C> {
    pub(crate) fn new(callback: C, masked: bool, writer: WriteFn, closer: CloseFn) -> Self {
        Self {
            http: HttpParser::new(),
            ws: FrameParser::new(),
            conn: Conn::new(masked, writer, closer),
            callback,
        }
    }

    /// The transport vanished. Without a completed close handshake this
    /// counts as an abnormal closure (1006).
    pub(crate) fn on_disconnect(&mut self) {
        if !self.conn.closing {
            self.callback.on_disconnect(&mut self.conn, close::ABNORMAL, "");
        }
        self.conn.closing = true;
    }

    /// Drain every complete websocket frame out of `chunk` plus whatever
    /// was already buffered. Parse failures close the transport.
    pub(crate) fn websocket_read(&mut self, chunk: &[u8]) {
        let mut chunk = chunk;
        loop {
            match self.ws.parse_chunk(chunk) {
                Err(_) => {
                    self.conn.close_transport();
                    return;
                }
                Ok(None) => return,
                Ok(Some(frame)) => {
                    chunk = &[];
                    self.handle_frame(frame);
                }
            }
        }
    }

    /// Protocol rules applied to every decoded frame.
    fn handle_frame(&mut self, frame: Frame) {
        match frame.opcode {
            OpCode::Text => {
                let text = String::from_utf8_lossy(&frame.payload);
                self.callback.on_text(&mut self.conn, &text);
            }
            OpCode::Binary => self.callback.on_binary(&mut self.conn, &frame.payload),
            OpCode::Ping => {
                // auto-reply before notifying
                let _ = self.conn.send_frame(&Frame::pong(frame.payload.clone()));
                self.callback.on_ping(&mut self.conn, &frame.payload);
            }
            OpCode::Pong => self.callback.on_pong(&mut self.conn, &frame.payload),
            OpCode::Close => {
                if !self.conn.closing {
                    // complete the close handshake by echoing
                    let _ = self.conn.send_frame(&Frame::new(OpCode::Close, frame.payload));
                } else {
                    // the echo of our own close arrived
                    self.conn.close_transport();
                }
            }
            OpCode::Continue | OpCode::Unknown => {}
        }

        self.flush_events();
    }

    /// Switch to websocket mode. The caller re-feeds residual bytes
    /// once the upgrade notification has gone out.
    pub(crate) fn switch_to_websocket(&mut self) {
        self.conn.mode = Mode::Websocket;
    }

    /// Re-feed bytes that arrived after the handshake message in the
    /// same read; they belong to the frame parser now.
    pub(crate) fn read_residual(&mut self) {
        let residual = self.http.take_residual();
        self.websocket_read(&residual);
    }

    /// Deliver a disconnect notification staged by a close-frame send.
    pub(crate) fn flush_events(&mut self) {
        if let Some((code, reason)) = self.conn.pending_disconnect.take() {
            self.callback.on_disconnect(&mut self.conn, code, &reason);
        }
    }

    /// Send and deliver any staged disconnect right away. Used by the
    /// public send surface, outside callback dispatch.
    pub(crate) fn send_frame(&mut self, frame: &Frame) -> Result<(), ProtoError> {
        let ret = self.conn.send_frame(frame);
        self.flush_events();
        ret
    }
}
