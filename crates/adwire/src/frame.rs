//! # Protocol Frames
//!
//! Defines the structure of identifier-service transactions: the request
//! frame (interface token plus a kind-specific payload) and the reply
//! envelope (exception marker, then the typed payload).
//!
//! ## Invariants
//! - **Panic Safety**: All decoding paths return `Result`, never panicking
//!   on unknown data.
//! - **Token First**: Every request opens with the interface token; a
//!   mismatch is rejected before any payload is touched.

use adpack::Decoder;
use adpack::Encoder;

use crate::error::Error;
use crate::error::RemoteFault;
use crate::error::Result;

/// Fixed string the remote service uses to authenticate that a transaction
/// targets the expected contract.
pub const INTERFACE_TOKEN: &str =
    "com.google.android.gms.ads.identifier.internal.IAdvertisingIdService";

/// Marker value for a reply that carries no exception.
const NO_EXCEPTION: i32 = 0;

/// Flag word the tracking-flag request carries as its only payload.
const TRACKING_FLAG_WORD: i32 = 1;

/// The two operations the remote contract exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Fetch the advertising identifier string.
    Identifier,
    /// Fetch the limited-tracking flag.
    TrackingFlag,
}

impl RequestKind {
    /// The transaction code selecting this operation on the remote side.
    pub const fn code(self) -> u32 {
        match self {
            Self::Identifier => 1,
            Self::TrackingFlag => 2,
        }
    }

    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Identifier),
            2 => Some(Self::TrackingFlag),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier => write!(f, "identifier"),
            Self::TrackingFlag => write!(f, "tracking-flag"),
        }
    }
}

/// Encodes an outbound request frame.
pub struct RequestEncoder {
    pub kind: RequestKind,
}

impl RequestEncoder {
    pub fn new(kind: RequestKind) -> Self {
        Self { kind }
    }

    /// Encode this request into the encoder: token, then kind payload.
    pub fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.str(INTERFACE_TOKEN)?;
        if let RequestKind::TrackingFlag = self.kind {
            enc.i32(TRACKING_FLAG_WORD)?;
        }
        Ok(())
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let mut enc = Encoder::new();
        self.encode(&mut enc)?;
        Ok(enc.into_bytes())
    }
}

/// Decodes an inbound request frame (service side).
pub struct RequestDecoder {
    pub kind: RequestKind,
}

impl RequestDecoder {
    /// Decode and validate a request frame for the given transaction code.
    pub fn decode(code: u32, bytes: &[u8]) -> Result<Self> {
        let kind = RequestKind::from_code(code).ok_or(Error::UnknownCode(code))?;

        let mut dec = Decoder::new(bytes);
        let token = dec.str()?;
        if token != INTERFACE_TOKEN {
            return Err(Error::BadToken(token.to_string()));
        }

        if let RequestKind::TrackingFlag = kind {
            let word = dec.i32()?;
            if word != TRACKING_FLAG_WORD {
                return Err(Error::ProtocolViolation(format!(
                    "unexpected flag word {}",
                    word
                )));
            }
        }

        Ok(Self { kind })
    }
}

/// Encodes an outbound reply frame (service side).
pub struct ReplyEncoder;

impl ReplyEncoder {
    /// A success reply carrying a string payload.
    pub fn ok_str(value: &str) -> Result<Vec<u8>> {
        let mut enc = Encoder::new();
        enc.i32(NO_EXCEPTION)?.str(value)?;
        Ok(enc.into_bytes())
    }

    /// A success reply carrying an integer payload.
    pub fn ok_i32(value: i32) -> Result<Vec<u8>> {
        let mut enc = Encoder::new();
        enc.i32(NO_EXCEPTION)?.i32(value)?;
        Ok(enc.into_bytes())
    }

    /// A reply declaring a remote exception instead of a payload.
    pub fn fault(fault: &RemoteFault) -> Result<Vec<u8>> {
        let mut enc = Encoder::new();
        enc.i32(fault.code)?.str(&fault.message)?;
        Ok(enc.into_bytes())
    }
}

/// Decodes an inbound reply frame.
///
/// The exception marker is read first; the payload decoder is only handed
/// out when the marker declares success.
pub struct ReplyDecoder<'a> {
    /// The result of the transaction.
    /// - `Ok(Decoder)`: success, positioned at the typed payload.
    /// - `Err(RemoteFault)`: the remote side declared an exception.
    pub status: std::result::Result<Decoder<'a>, RemoteFault>,
}

impl<'a> ReplyDecoder<'a> {
    /// Decode a reply envelope from raw reply bytes.
    pub fn decode(bytes: &'a [u8]) -> Result<Self> {
        let mut dec = Decoder::new(bytes);
        let marker = dec.i32()?;

        if marker == NO_EXCEPTION {
            return Ok(Self { status: Ok(dec) });
        }

        let message = dec.str()?.to_string();
        Ok(Self {
            status: Err(RemoteFault {
                code: marker,
                message,
            }),
        })
    }

    /// Shortcut for a reply whose payload is a single string.
    pub fn into_str(self) -> Result<std::result::Result<String, RemoteFault>> {
        match self.status {
            Ok(mut dec) => Ok(Ok(dec.str()?.to_string())),
            Err(fault) => Ok(Err(fault)),
        }
    }

    /// Shortcut for a reply whose payload is a single integer.
    pub fn into_i32(self) -> Result<std::result::Result<i32, RemoteFault>> {
        match self.status {
            Ok(mut dec) => Ok(Ok(dec.i32()?)),
            Err(fault) => Ok(Err(fault)),
        }
    }
}
