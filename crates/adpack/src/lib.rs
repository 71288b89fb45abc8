//! # adpack
//!
//! The flat binary buffer format used for identifier-service transactions.
//! A buffer is an untagged little-endian value sequence; the wire contract
//! (see `adwire`) fixes which values appear at which position.

pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod types;

pub use types::Error;
pub use types::Result;

pub use cursor::Cursor;
pub use decoder::Decoder;
pub use encoder::Encoder;
