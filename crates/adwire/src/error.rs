//! # Error Definitions
//!
//! Failures while speaking the identifier-service wire protocol.

use adpack::Error as PackError;

/// Operational failures within the protocol codec itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The underlying buffer read or write failed.
    Pack(PackError),
    /// The interface token did not match the expected contract.
    BadToken(String),
    /// The transaction code does not name a known operation.
    UnknownCode(u32),
    /// The frame structure was malformed.
    ProtocolViolation(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pack(e) => write!(f, "buffer error: {}", e),
            Self::BadToken(token) => write!(f, "unexpected interface token '{}'", token),
            Self::UnknownCode(code) => write!(f, "unknown transaction code {}", code),
            Self::ProtocolViolation(msg) => write!(f, "protocol violation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<PackError> for Error {
    fn from(e: PackError) -> Self {
        Self::Pack(e)
    }
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An exception declared by the remote service in a reply.
///
/// Distinct from `Error`: this is the *remote* side reporting a failure
/// through a well-formed reply, whereas `Error` is the codec failing to
/// read or write a frame at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFault {
    /// Non-zero exception code from the reply envelope.
    pub code: i32,
    /// Message carried alongside the code.
    pub message: String,
}

impl std::fmt::Display for RemoteFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "remote exception {}: {}", self.code, self.message)
    }
}

impl std::error::Error for RemoteFault {}
