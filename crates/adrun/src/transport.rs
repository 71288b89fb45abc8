//! # Transport Abstraction
//!
//! A minimal, async interface for submitting one binary transaction to a
//! connected service.
//!
//! ## Philosophy
//!
//! - **Byte-Oriented**: The Transport knows nothing about interface tokens,
//!   reply envelopes, or payload types. It moves opaque buffers.
//! - **Request-Response**: The fundamental interaction model is "send bytes
//!   under a transaction code, await reply bytes". Everything richer is
//!   built on top of this, not defined here.

use std::fmt;

/// Errors that occur at the IPC/transport layer.
#[derive(Debug, Clone)]
pub enum Error {
    /// The remote side went away while the transaction was in flight.
    Dead(String),
    /// Generic I/O error or internal transport failure.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dead(msg) => write!(f, "remote side died: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// A mechanism to submit one transaction and receive its reply.
///
/// This trait is designed to be object-safe (`Arc<dyn Transport>`).
/// Implementers substitute their platform's native IPC primitive here; the
/// exchange logic above never changes.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Submits a request buffer under the given transaction code and waits
    /// for the reply buffer.
    ///
    /// # invariants
    /// - Must return `Ok(vec)` with the raw reply bytes on success.
    /// - Must return `Err` if the call itself faults.
    /// - Should not interpret the payload content.
    async fn transact(&self, code: u32, request: &[u8]) -> Result<Vec<u8>>;
}
