//! Client half of the handshake.
//!
//! From [RFC-6455 Section 4.1](https://datatracker.ietf.org/doc/html/rfc6455#section-4.1):
//!
//! Once a connection to the server has been established, the client
//! MUST send an opening handshake to the server. The handshake consists
//! of an HTTP Upgrade request, along with a list of required and
//! optional header fields.
//!
//! The response must carry status 101 and a `Sec-WebSocket-Accept`
//! value derived from the key this client sent; anything else closes
//! the transport without upgrading.

use super::{Callback, CloseFn, Conn, Mode, Protocol, WriteFn};
use crate::error::ProtoError;
use crate::frame::Frame;
use crate::handshake::{
    self, CONNECTION_VALUE, HEADER_CONNECTION, HEADER_HOST, HEADER_SEC_ACCEPT, HEADER_SEC_KEY,
    HEADER_SEC_VERSION, HEADER_UPGRADE, UPGRADE_VALUE, WEBSOCKET_VERSION,
};
use crate::http::{Headers, HttpFrame, HttpRequest, HttpResponse};

/// Client-side callbacks: everything in [`Callback`] plus the upgrade
/// notification carrying the raw handshake response.
pub trait ClientCallback: Callback {
    fn on_upgrade(&mut self, _conn: &mut Conn, _response: &HttpResponse) {}
}

/// Client-side protocol engine for one connection.
pub struct ClientProtocol<C: ClientCallback> {
    proto: Protocol<C>,
    sec_key: [u8; 24],
    path: String,
    host: Option<String>,
}

impl<C: ClientCallback> ClientProtocol<C> {
    /// Constructor. Generates this session's random handshake key.
    pub fn new(
        callback: C,
        path: &str,
        host: Option<String>,
        writer: WriteFn,
        closer: CloseFn,
    ) -> Self {
        Self {
            proto: Protocol::new(callback, true, writer, closer),
            sec_key: handshake::new_sec_key(),
            path: path.to_string(),
            host,
        }
    }

    /// The transport is up: notify the callback and issue the upgrade
    /// request.
    pub fn on_connect(&mut self) {
        self.proto.callback.on_connect(&mut self.proto.conn);

        let mut headers = Headers::new();
        headers.append(HEADER_UPGRADE, UPGRADE_VALUE);
        headers.append(HEADER_CONNECTION, CONNECTION_VALUE);
        if let Some(host) = &self.host {
            headers.append(HEADER_HOST, host);
        }
        headers.append(HEADER_SEC_KEY, &String::from_utf8_lossy(&self.sec_key));
        headers.append(HEADER_SEC_VERSION, WEBSOCKET_VERSION);

        let request = HttpRequest::new("GET", &self.path, headers, Vec::new());
        let _ = self.proto.conn.send_request(&request);
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

    /// Validate the handshake response.
    fn on_http_frame(&mut self, frame: HttpFrame) {
        let HttpFrame::Response(response) = frame else {
            self.proto.conn.close_transport();
            return;
        };

        if response.status != 101 {
            self.proto.conn.close_transport();
            return;
        }

        let expected = handshake::accept_key(&self.sec_key);
        if response.header(HEADER_SEC_ACCEPT).map(str::as_bytes) != Some(&expected[..]) {
            self.proto.conn.close_transport();
            return;
        }

        self.proto.switch_to_websocket();
        // notify the upgrade before any frame pipelined behind the
        // response is dispatched
        self.proto.callback.on_upgrade(&mut self.proto.conn, &response);
        self.proto.flush_events();
        self.proto.read_residual();
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

    /// Send a plain HTTP request. Fails after the upgrade.
    pub fn send_request(&mut self, request: &HttpRequest) -> Result<(), ProtoError> {
        self.proto.conn.send_request(request)
    }

    /// The sending half, as handed to callbacks.
    pub fn conn(&mut self) -> &mut Conn { &mut self.proto.conn }
}

impl<C: ClientCallback> std::fmt::Debug for ClientProtocol<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientProtocol")
            .field("conn", &self.proto.conn)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
