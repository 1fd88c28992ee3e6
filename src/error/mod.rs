#![allow(missing_docs)]
//! Errors

mod http;
mod frame;
mod proto;

pub use http::HttpError;
pub use frame::FrameError;
pub use proto::ProtoError;

use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Error {
    Http(HttpError),

    Frame(FrameError),

    Proto(ProtoError),
}

impl From<HttpError> for Error {
    fn from(e: HttpError) -> Self { Error::Http(e) }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self { Error::Frame(e) }
}

impl From<ProtoError> for Error {
    fn from(e: ProtoError) -> Self { Error::Proto(e) }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Error::*;
        match self {
            Http(e) => write!(f, "Http error: {}", e),
            Frame(e) => write!(f, "Frame error: {}", e),
            Proto(e) => write!(f, "Protocol error: {}", e),
        }
    }
}

impl std::error::Error for Error {}
