//! Core types for the adpack buffer format

/// Failures while reading or writing a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The buffer ended before the value did; carries the number of missing bytes.
    Truncated(usize),
    /// A string payload was not valid UTF-8.
    InvalidUtf8,
    /// A blob exceeded the u32 length prefix.
    BlobTooLarge(usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncated(n) => write!(f, "buffer truncated: {} more bytes needed", n),
            Self::InvalidUtf8 => write!(f, "string payload is not valid UTF-8"),
            Self::BlobTooLarge(n) => write!(f, "blob of {} bytes exceeds length prefix", n),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
