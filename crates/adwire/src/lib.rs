//! # adwire
//!
//! The wire protocol of the advertising-identifier service: a fixed
//! interface token, two transaction codes, and a reply envelope that leads
//! with a remote-declared exception marker.
//!
//! ## Architecture
//!
//! This library sits between `adpack` (raw buffers) and the client runtime.
//! It owns the frame layout in both directions so that a client and an
//! in-process service double can speak the same bytes.

pub mod error;
pub mod frame;

pub use error::Error;
pub use error::RemoteFault;
pub use error::Result;

pub use frame::RequestDecoder;
pub use frame::RequestEncoder;
pub use frame::RequestKind;
pub use frame::ReplyDecoder;
pub use frame::ReplyEncoder;
pub use frame::INTERFACE_TOKEN;
