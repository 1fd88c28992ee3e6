//! Incremental HTTP message parser.
//!
//! Consumes raw bytes in chunks of any size and produces complete
//! [`HttpFrame`]s. The leading line decides the direction: a first
//! token starting with `HTTP/` is a response, anything else is a
//! request. Bodies are delimited by `Content-Length` only.

use super::{Headers, HttpFrame, HttpRequest, HttpResponse};
use crate::buffer::ByteStream;
use crate::error::HttpError;

#[derive(Debug)]
enum State {
    LeadingLine,
    Headers([String; 3]),
    Data([String; 3]),
}

/// Incremental request/response parser.
///
/// After emitting a message the parser rewinds to the leading-line
/// state while keeping residual buffered bytes, so pipelined messages
/// parse straight through.
#[derive(Debug)]
pub struct HttpParser {
    buffer: ByteStream,
    headers: Headers,
    state: State,
}

impl Default for HttpParser {
    fn default() -> Self {
        Self {
            buffer: ByteStream::default(),
            headers: Headers::new(),
            state: State::LeadingLine,
        }
    }
}

impl HttpParser {
    /// Constructor.
    pub fn new() -> Self { Self::default() }

    /// Drain buffered bytes not consumed by the last message.
    ///
    /// Used when the connection leaves HTTP mode: bytes pipelined after
    /// the handshake message belong to the websocket parser.
    pub fn take_residual(&mut self) -> Vec<u8> {
        let len = self.buffer.len();
        self.buffer.read(len)
    }

    /// Feed a chunk and try to produce the next complete message.
    ///
    /// An empty chunk still pumps already-buffered bytes.
    pub fn parse_chunk(&mut self, chunk: &[u8]) -> Result<Option<HttpFrame>, HttpError> {
        if !chunk.is_empty() {
            self.buffer.append(chunk);
        }

        loop {
            match &self.state {
                State::LeadingLine => {
                    let Some(line) = self.read_line() else {
                        return Ok(None);
                    };
                    self.state = State::Headers(parse_leading_line(&line)?);
                }
                State::Headers(_) => {
                    let Some(line) = self.read_line() else {
                        return Ok(None);
                    };
                    if line.is_empty() {
                        let State::Headers(leading) =
                            std::mem::replace(&mut self.state, State::LeadingLine)
                        else {
                            unreachable!()
                        };
                        self.state = State::Data(leading);
                        continue;
                    }

                    let (name, value) =
                        line.split_once(':').ok_or(HttpError::HeaderLine)?;
                    self.headers.append(name, value.trim());
                }
                State::Data(leading) => {
                    let leading = leading.clone();
                    return self.handle_data(leading);
                }
            }
        }
    }

    /// Body phase: emit, or suspend until enough bytes are buffered.
    fn handle_data(&mut self, leading: [String; 3]) -> Result<Option<HttpFrame>, HttpError> {
        let is_response = leading[0].starts_with("HTTP/");

        if is_response {
            let status: u16 = leading[1].parse().map_err(|_| HttpError::StatusCode)?;

            // informational, 204 and 304 never carry a body,
            // a content-length header does not override that
            if (100..200).contains(&status) || status == 204 || status == 304 {
                return Ok(Some(self.emit_response(leading, status, Vec::new())));
            }

            if let Some(body) = self.read_body()? {
                return Ok(Some(self.emit_response(leading, status, body)));
            }

            if self.headers.get("Content-Length").is_some() {
                // waiting for the rest of the body
                self.state = State::Data(leading);
                return Ok(None);
            }

            // no content-length and no bodyless status: the message end
            // cannot be determined (HTTP/1.0 style), suspend indefinitely
            self.state = State::Data(leading);
            return Ok(None);
        }

        if let Some(body) = self.read_body()? {
            return Ok(Some(self.emit_request(leading, body)));
        }

        if self.headers.get("Content-Length").is_some() {
            // waiting for the rest of the body
            self.state = State::Data(leading);
            return Ok(None);
        }

        // requests without a content-length have no body
        Ok(Some(self.emit_request(leading, Vec::new())))
    }

    /// Read a `Content-Length` body.
    ///
    /// `Ok(None)` means either no such header, or not enough bytes yet;
    /// the caller tells the two apart by re-checking the header.
    fn read_body(&mut self) -> Result<Option<Vec<u8>>, HttpError> {
        let Some(value) = self.headers.get("Content-Length") else {
            return Ok(None);
        };
        let content_length: usize =
            value.trim().parse().map_err(|_| HttpError::ContentLength)?;

        if self.buffer.len() < content_length {
            return Ok(None);
        }
        Ok(Some(self.buffer.read(content_length)))
    }

    fn emit_request(&mut self, leading: [String; 3], body: Vec<u8>) -> HttpFrame {
        let [method, path, version] = leading;
        let frame = HttpFrame::Request(HttpRequest {
            method,
            path,
            version,
            headers: std::mem::take(&mut self.headers),
            body,
        });
        self.state = State::LeadingLine;
        frame
    }

    fn emit_response(&mut self, leading: [String; 3], status: u16, body: Vec<u8>) -> HttpFrame {
        let [version, _, reason] = leading;
        let frame = HttpFrame::Response(HttpResponse {
            version,
            status,
            reason,
            headers: std::mem::take(&mut self.headers),
            body,
        });
        self.state = State::LeadingLine;
        frame
    }

    /// Read one CRLF-terminated line, or `None` if no full line is buffered.
    fn read_line(&mut self) -> Option<String> {
        let data = self.buffer.as_slice();
        let at = data.windows(2).position(|w| w == b"\r\n")?;

        let line = String::from_utf8_lossy(&data[..at]).into_owned();
        self.buffer.consume(at + 2);
        Some(line)
    }
}

/// Split the leading line into exactly 3 whitespace-separated tokens.
fn parse_leading_line(line: &str) -> Result<[String; 3], HttpError> {
    let mut parts = line.splitn(3, ' ').map(str::to_string);
    let parsed = [
        parts.next().ok_or(HttpError::LeadingLine)?,
        parts.next().ok_or(HttpError::LeadingLine)?,
        parts.next().ok_or(HttpError::LeadingLine)?,
    ];

    if !parsed[0].starts_with("HTTP/") && !parsed[2].starts_with("HTTP/") {
        return Err(HttpError::LeadingLine);
    }

    Ok(parsed)
}
