//! # adrun
//!
//! Retrieves the advertising identifier and limited-tracking flag from the
//! platform's identifier service over its raw binary IPC surface, without
//! the vendor SDK.
//!
//! The exchange runs on a background task, and the outcome — success or a
//! typed error — reaches a caller-supplied listener exactly once, on a
//! caller-chosen execution context. See [`get_ad_info`] for the one-call
//! entry point and [`client::AdIdClient`] for the executor-injected form.

pub mod client;
pub mod connector;
pub mod executor;
pub mod local;
pub mod mock_service;
pub mod service;
pub mod transport;

pub use client::get_ad_info;
pub use client::AdIdClient;
pub use client::AdInfo;
pub use client::Error;
pub use client::Listener;

pub use connector::BindTarget;
pub use connector::Platform;

pub use executor::Deferred;
pub use executor::Executor;
pub use executor::Immediate;

pub use local::LocalPlatform;
pub use service::IdentifierService;
pub use transport::Transport;
