//! # Identifier Exchange
//!
//! The sequence that turns a platform handle into exactly one callback:
//! provider check, bind, two transactions, validation, delivery. Every
//! failure point collapses into a single terminal outcome; nothing
//! propagates past this module as an unhandled fault.

use std::sync::Arc;

use crate::connector;
use crate::connector::BindTarget;
use crate::connector::Platform;
use crate::executor::Deferred;
use crate::executor::Executor;
use crate::service;
use crate::service::IdentifierService;

/// Package whose presence marks the identifier provider as installed.
pub const PROVIDER_PACKAGE: &str = "com.android.vending";

/// Bind action the identifier service answers to.
pub const SERVICE_ACTION: &str = "com.google.android.gms.ads.identifier.service.START";

/// Package hosting the identifier service.
pub const SERVICE_PACKAGE: &str = "com.google.android.gms";

/// Terminal outcome taxonomy for one exchange. The categories are mutually
/// exclusive; the first failure wins and no step is retried.
#[derive(Debug, Clone)]
pub enum Error {
    /// The provider package is not installed.
    ProviderMissing(String),
    /// The bind request was refused synchronously.
    BadConnection,
    /// The wait for the service connection was abandoned.
    Interrupted(String),
    /// A transaction faulted or the remote side declared an exception.
    Remote(service::Error),
    /// The exchange succeeded but yielded no usable identifier.
    EmptyIdentifier,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProviderMissing(name) => write!(f, "package '{}' not found", name),
            Self::BadConnection => write!(f, "Bad GMS service connection"),
            Self::Interrupted(msg) => write!(f, "{}", msg),
            Self::Remote(e) => write!(f, "{}", e),
            Self::EmptyIdentifier => write!(f, "Ad ID is null or empty"),
        }
    }
}

impl std::error::Error for Error {}

impl From<connector::Error> for Error {
    fn from(e: connector::Error) -> Self {
        match e {
            connector::Error::PackageMissing(name) => Self::ProviderMissing(name),
            connector::Error::Refused => Self::BadConnection,
            connector::Error::Interrupted(msg) => Self::Interrupted(msg),
        }
    }
}

impl From<service::Error> for Error {
    fn from(e: service::Error) -> Self {
        Self::Remote(e)
    }
}

/// Advertising identifier and limited-tracking flag, as one immutable value.
///
/// Only a fully successful exchange produces one; the identifier is never
/// empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdInfo {
    pub id: String,
    pub tracking_limited: bool,
}

/// Client-side callback capability. Exactly one of the two methods fires,
/// exactly once, per exchange.
pub trait Listener: Send + 'static {
    fn on_success(&self, info: AdInfo);
    fn on_error(&self, error: Error);
}

/// Drives one identifier exchange per `fetch` call against a platform,
/// delivering the outcome through the supplied executor.
pub struct AdIdClient {
    platform: Arc<dyn Platform>,
    executor: Arc<dyn Executor>,
}

impl AdIdClient {
    pub fn new(platform: Arc<dyn Platform>, executor: Arc<dyn Executor>) -> Self {
        Self { platform, executor }
    }

    /// Run the full exchange and deliver exactly one outcome to `listener`.
    ///
    /// The exchange itself runs on the calling task; only the callback goes
    /// through the executor.
    pub async fn fetch<L: Listener>(&self, listener: L) {
        let outcome = self.exchange().await;
        match &outcome {
            Ok(info) => {
                tracing::debug!(
                    tracking_limited = info.tracking_limited,
                    "identifier exchange complete"
                );
            }
            Err(error) => tracing::warn!(%error, "identifier exchange failed"),
        }

        self.executor.post(Box::new(move || match outcome {
            Ok(info) => listener.on_success(info),
            Err(error) => listener.on_error(error),
        }));
    }

    async fn exchange(&self) -> Result<AdInfo, Error> {
        connector::resolve_package(self.platform.as_ref(), PROVIDER_PACKAGE)?;

        let target = BindTarget::new(SERVICE_ACTION, SERVICE_PACKAGE);
        let (binding, transport) = connector::connect(&self.platform, target).await?;

        // the binding guard stays live until both transactions settle, and
        // unbinds on every path out of this function
        let service = IdentifierService::new(transport);
        let id = service.identifier().await?;
        let tracking_limited = service.tracking_limited().await?;
        drop(binding);

        if id.is_empty() {
            return Err(Error::EmptyIdentifier);
        }
        Ok(AdInfo {
            id,
            tracking_limited,
        })
    }
}

/// Convenience entry point: spawns its own background task and an
/// internally created deferred callback context, so the caller never
/// touches execution contexts directly.
///
/// Must be called within a tokio runtime.
pub fn get_ad_info<L: Listener>(platform: Arc<dyn Platform>, listener: L) {
    let executor: Arc<dyn Executor> = Arc::new(Deferred::spawn());
    let client = AdIdClient::new(platform, executor);
    tokio::spawn(async move {
        client.fetch(listener).await;
    });
}
