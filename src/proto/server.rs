//! Server half of the handshake.
//!
//! From [RFC-6455 Section 4.2](https://datatracker.ietf.org/doc/html/rfc6455#section-4.2):
//!
//! When a client starts a WebSocket connection, it sends its part of the
//! opening handshake. The server must parse at least part of this
//! handshake in order to obtain the necessary information to generate
//! the server part of the handshake.
//!
//! Requests without the upgrade headers are handed to the callback as
//! ordinary HTTP traffic; upgrade requests missing the key are rejected
//! with a 400.

use super::{Callback, CloseFn, Conn, Mode, Protocol, WriteFn};
use crate::error::ProtoError;
use crate::frame::Frame;
use crate::handshake::{
    self, CONNECTION_VALUE, HEADER_CONNECTION, HEADER_SEC_ACCEPT, HEADER_SEC_KEY, HEADER_UPGRADE,
    UPGRADE_VALUE,
};
use crate::http::{Headers, HttpFrame, HttpRequest, HttpResponse};

/// Server-side callbacks: everything in [`Callback`] plus plain HTTP
/// requests and the upgrade notification carrying the raw request.
pub trait ServerCallback: Callback {
    fn on_http_request(&mut self, _conn: &mut Conn, _request: &HttpRequest) {}

    fn on_upgrade(&mut self, _conn: &mut Conn, _request: &HttpRequest) {}
}

/// Server-side protocol engine for one accepted connection.
pub struct ServerProtocol<C: ServerCallback> {
    proto: Protocol<C>,
}

impl<C: ServerCallback> ServerProtocol<C> {
    /// Constructor.
    pub fn new(callback: C, writer: WriteFn, closer: CloseFn) -> Self {
        Self {
            proto: Protocol::new(callback, false, writer, closer),
        }
    }

    /// The transport is up.
    pub fn on_connect(&mut self) {
        self.proto.callback.on_connect(&mut self.proto.conn);
    }

    /// The transport went away without a close handshake.
    pub fn on_disconnect(&mut self) { self.proto.on_disconnect() }

    /// Feed raw transport bytes, any chunk size.
    ///
    /// Complete messages are dispatched before returning; parse failures
    /// close the transport.
    pub fn on_read(&mut self, chunk: &[u8]) {
        let mut chunk = chunk;
        loop {
            if self.proto.conn.mode() == Mode::Websocket {
                self.proto.websocket_read(chunk);
                return;
            }

            match self.proto.http.parse_chunk(chunk) {
                Err(_) => {
                    self.proto.conn.close_transport();
                    return;
                }
                Ok(None) => return,
                Ok(Some(frame)) => {
                    chunk = &[];
                    self.on_http_frame(frame);
                }
            }
        }
    }

    /// Accept an upgrade, serve plain HTTP, or reject.
    fn on_http_frame(&mut self, frame: HttpFrame) {
        let HttpFrame::Request(request) = frame else {
            self.reject();
            return;
        };

        let connection = request.header(HEADER_CONNECTION);
        let upgrade = request.header(HEADER_UPGRADE);
        let is_upgrade = connection.is_some_and(|v| v.eq_ignore_ascii_case(CONNECTION_VALUE))
            && upgrade.is_some_and(|v| v.eq_ignore_ascii_case(UPGRADE_VALUE));

        if !is_upgrade {
            // some other kind of HTTP request
            self.proto.callback.on_http_request(&mut self.proto.conn, &request);
            return;
        }

        let Some(sec_key) = request.header(HEADER_SEC_KEY) else {
            self.reject();
            return;
        };

        let accept = handshake::accept_key(sec_key.as_bytes());
        let mut headers = Headers::new();
        headers.append(HEADER_UPGRADE, UPGRADE_VALUE);
        headers.append(HEADER_CONNECTION, CONNECTION_VALUE);
        headers.append(HEADER_SEC_ACCEPT, &String::from_utf8_lossy(&accept));

        let response = HttpResponse::new(101, "Switching Protocols", headers, Vec::new());
        let _ = self.proto.conn.send_response(&response);

        self.proto.switch_to_websocket();
        // notify the upgrade before any frame pipelined behind the
        // request is dispatched
        self.proto.callback.on_upgrade(&mut self.proto.conn, &request);
        self.proto.flush_events();
        self.proto.read_residual();
    }

    fn reject(&mut self) {
        let response = HttpResponse::new(400, "Invalid Request", Headers::new(), Vec::new());
        let _ = self.proto.conn.send_response(&response);
        self.proto.conn.close_transport();
    }

    /// Send a websocket frame. Fails until the upgrade completes.
    pub fn send_frame(&mut self, frame: &Frame) -> Result<(), ProtoError> {
        self.proto.send_frame(frame)
    }

    pub fn send_text(&mut self, text: &str) -> Result<(), ProtoError> {
        self.proto.send_frame(&Frame::text(text))
    }

    pub fn send_binary(&mut self, data: &[u8]) -> Result<(), ProtoError> {
        self.proto.send_frame(&Frame::binary(data.to_vec()))
    }

    pub fn send_ping(&mut self, data: &[u8]) -> Result<(), ProtoError> {
        self.proto.send_frame(&Frame::ping(data.to_vec()))
    }

    pub fn send_pong(&mut self, data: &[u8]) -> Result<(), ProtoError> {
        self.proto.send_frame(&Frame::pong(data.to_vec()))
    }

    /// Start the close handshake.
    pub fn send_close(&mut self, code: u16, reason: &str) -> Result<(), ProtoError> {
        self.proto.send_frame(&Frame::close(code, reason))
    }

    /// Send a plain HTTP response. Fails after the upgrade.
    pub fn send_response(&mut self, response: &HttpResponse) -> Result<(), ProtoError> {
        self.proto.conn.send_response(response)
    }

    /// The sending half, as handed to callbacks.
    pub fn conn(&mut self) -> &mut Conn { &mut self.proto.conn }
}

impl<C: ServerCallback> std::fmt::Debug for ServerProtocol<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerProtocol")
            .field("conn", &self.proto.conn)
            .finish_non_exhaustive()
    }
}
