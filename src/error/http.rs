use std::fmt::{Display, Formatter};

/// Malformed HTTP message. Always fatal to the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpError {
    LeadingLine,

    HeaderLine,

    StatusCode,

    ContentLength,
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use HttpError::*;
        match self {
            LeadingLine => write!(f, "Malformed leading line"),
            HeaderLine => write!(f, "Expected colon in header line"),
            StatusCode => write!(f, "Malformed status code"),
            ContentLength => write!(f, "Malformed content-length value"),
        }
    }
}

// use default impl
impl std::error::Error for HttpError {}
