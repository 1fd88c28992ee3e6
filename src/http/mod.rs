//! HTTP/1.1 message framing.
//!
//! Only the subset needed to carry a websocket handshake:
//! CRLF-delimited head, `Content-Length` bodies, no chunked
//! transfer encoding.

pub mod headers;
pub mod parser;

pub use headers::Headers;
pub use parser::HttpParser;

/// A complete HTTP message, either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpFrame {
    Request(HttpRequest),
    Response(HttpResponse),
}

impl HttpFrame {
    /// Serialize to wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            HttpFrame::Request(r) => r.encode(),
            HttpFrame::Response(r) => r.encode(),
        }
    }
}

/// An HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub version: String,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// An HTTP/1.1 request.
    pub fn new(method: &str, path: &str, headers: Headers, body: Vec<u8>) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            version: "HTTP/1.1".to_string(),
            headers,
            body,
        }
    }

    /// Case-insensitive header lookup.
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> { self.headers.get(name) }

    /// Serialize to wire bytes, headers in insertion order.
    pub fn encode(&self) -> Vec<u8> {
        let leading = format!("{} {} {}", self.method, self.path, self.version);
        encode_message(&leading, &self.headers, &self.body)
    }
}

/// An HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub version: String,
    pub status: u16,
    pub reason: String,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// An HTTP/1.1 response.
    pub fn new(status: u16, reason: &str, headers: Headers, body: Vec<u8>) -> Self {
        Self {
            version: "HTTP/1.1".to_string(),
            status,
            reason: reason.to_string(),
            headers,
            body,
        }
    }

    /// Case-insensitive header lookup.
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> { self.headers.get(name) }

    /// Serialize to wire bytes, headers in insertion order.
    pub fn encode(&self) -> Vec<u8> {
        let leading = format!("{} {} {}", self.version, self.status, self.reason);
        encode_message(&leading, &self.headers, &self.body)
    }
}

fn encode_message(leading: &str, headers: &Headers, body: &[u8]) -> Vec<u8> {
    let mut head = String::with_capacity(leading.len() + 64);
    head.push_str(leading);
    head.push_str("\r\n");
    for (name, value) in headers.iter() {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");

    let mut out = head.into_bytes();
    out.extend_from_slice(body);
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_request() {
        let request = HttpRequest::new(
            "GET",
            "/chat",
            [("Host", "example.com"), ("Upgrade", "websocket")]
                .into_iter()
                .collect(),
            Vec::new(),
        );

        assert_eq!(
            request.encode(),
            b"GET /chat HTTP/1.1\r\n\
              Host: example.com\r\n\
              Upgrade: websocket\r\n\
              \r\n"
        );
    }

    #[test]
    fn encode_response_with_body() {
        let response = HttpResponse::new(
            200,
            "OK",
            [("Content-Length", "5")].into_iter().collect(),
            b"hello".to_vec(),
        );

        assert_eq!(
            response.encode(),
            b"HTTP/1.1 200 OK\r\n\
              Content-Length: 5\r\n\
              \r\n\
              hello"
        );
    }
}
