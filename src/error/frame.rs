use std::fmt::{Display, Formatter};

/// Malformed websocket frame. Always fatal to the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    ReservedBits,

    FragmentedControl,

    ControlTooLarge,

    MessageTooLarge,
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use FrameError::*;
        match self {
            ReservedBits => write!(f, "Undefined use of reserved bits"),
            FragmentedControl => write!(f, "Fragmented control frame"),
            ControlTooLarge => write!(f, "Control frame payload over 125 bytes"),
            MessageTooLarge => write!(f, "Message size is not representable"),
        }
    }
}

// use default impl
impl std::error::Error for FrameError {}
