//! # Typed Service Client
//!
//! This module provides the typed view of the identifier service over a
//! connected transport. It encapsulates the encoding of request frames,
//! transport invocation, and decoding of reply envelopes.

use std::sync::Arc;

use adwire::RemoteFault;
use adwire::ReplyDecoder;
use adwire::RequestEncoder;
use adwire::RequestKind;

use crate::transport;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub enum Error {
    /// The transact call itself faulted.
    Transport(transport::Error),
    /// A frame could not be encoded or decoded.
    Wire(adwire::Error),
    /// The remote side declared an exception in its reply.
    Remote(RemoteFault),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport fault: {}", e),
            Self::Wire(e) => write!(f, "wire error: {}", e),
            Self::Remote(fault) => write!(f, "{}", fault),
        }
    }
}

impl std::error::Error for Error {}

impl From<transport::Error> for Error {
    fn from(e: transport::Error) -> Self {
        Self::Transport(e)
    }
}

impl From<adwire::Error> for Error {
    fn from(e: adwire::Error) -> Self {
        Self::Wire(e)
    }
}

impl From<RemoteFault> for Error {
    fn from(fault: RemoteFault) -> Self {
        Self::Remote(fault)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Typed client for the two identifier-service operations.
///
/// Each operation is one complete encode → transact → decode round; the
/// request and reply buffers live only for the duration of that round.
pub struct IdentifierService {
    transport: Arc<dyn Transport>,
}

impl IdentifierService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn transact(&self, kind: RequestKind) -> Result<Vec<u8>> {
        let request = RequestEncoder::new(kind).into_bytes()?;
        let reply = self.transport.transact(kind.code(), &request).await?;
        Ok(reply)
    }

    /// Fetch the advertising identifier string.
    pub async fn identifier(&self) -> Result<String> {
        let reply = self.transact(RequestKind::Identifier).await?;
        let value = ReplyDecoder::decode(&reply)?.into_str()?;
        Ok(value?)
    }

    /// Fetch the limited-tracking flag. A non-zero reply word means
    /// tracking is limited.
    pub async fn tracking_limited(&self) -> Result<bool> {
        let reply = self.transact(RequestKind::TrackingFlag).await?;
        let word = ReplyDecoder::decode(&reply)?.into_i32()?;
        Ok(word? != 0)
    }
}
