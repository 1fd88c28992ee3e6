use std::fmt::{Display, Formatter};

/// Caller-contract violation, reported synchronously to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtoError {
    FrameInHttpMode,

    HttpInWebsocketMode,
}

impl Display for ProtoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use ProtoError::*;
        match self {
            FrameInHttpMode => write!(f, "Cannot send websocket frame in HTTP mode"),
            HttpInWebsocketMode => write!(f, "Cannot send HTTP frame in websocket mode"),
        }
    }
}

// use default impl
impl std::error::Error for ProtoError {}
