//! Mock identifier services for testing.
//!
//! These are used internally by the test suite and are not part of the
//! production flow.

use adwire::RemoteFault;
use adwire::ReplyEncoder;
use adwire::RequestDecoder;
use adwire::RequestKind;

use crate::transport;
use crate::transport::Transport;

/// A service double that answers both transactions from configured values.
///
/// Requests are decoded and validated for real, so a client with a broken
/// token or payload fails here the same way it would against the remote
/// service.
pub struct MockIdentifierService {
    id: String,
    tracking_limited: bool,
    fault: Option<RemoteFault>,
}

impl MockIdentifierService {
    pub fn new(id: impl Into<String>, tracking_limited: bool) -> Self {
        Self {
            id: id.into(),
            tracking_limited,
            fault: None,
        }
    }

    /// Answer every transaction with the given remote exception.
    pub fn faulty(fault: RemoteFault) -> Self {
        Self {
            id: String::new(),
            tracking_limited: false,
            fault: Some(fault),
        }
    }
}

#[async_trait::async_trait]
impl Transport for MockIdentifierService {
    async fn transact(&self, code: u32, request: &[u8]) -> transport::Result<Vec<u8>> {
        let decoded = RequestDecoder::decode(code, request)
            .map_err(|e| transport::Error::Io(e.to_string()))?;

        if let Some(fault) = &self.fault {
            return ReplyEncoder::fault(fault).map_err(|e| transport::Error::Io(e.to_string()));
        }

        let reply = match decoded.kind {
            RequestKind::Identifier => ReplyEncoder::ok_str(&self.id),
            RequestKind::TrackingFlag => ReplyEncoder::ok_i32(self.tracking_limited as i32),
        };
        reply.map_err(|e| transport::Error::Io(e.to_string()))
    }
}
