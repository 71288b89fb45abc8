//! # Connection Manager
//!
//! Discovers the remote provider and turns a bind request into a live
//! transport handle.
//!
//! ## Architecture
//!
//! - **Platform**: the capability the surrounding system must supply —
//!   package lookup, service binding, unbinding.
//! - **Handoff**: a single-slot channel passing the transport from the
//!   platform's asynchronous "connected" notification to the one waiter
//!   suspended on it.
//! - **Binding**: a scoped guard whose drop releases the accepted bind on
//!   every exit path.

use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::transport::Transport;

/// Errors raised while locating or connecting to the remote service.
#[derive(Debug, Clone)]
pub enum Error {
    /// The named package is not installed.
    PackageMissing(String),
    /// The bind request was rejected synchronously.
    Refused,
    /// The wait for the connected notification was abandoned.
    Interrupted(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PackageMissing(name) => write!(f, "package '{}' not found", name),
            Self::Refused => write!(f, "Bad GMS service connection"),
            Self::Interrupted(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Names the service endpoint a bind request targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindTarget {
    pub action: String,
    pub package: String,
}

impl BindTarget {
    pub fn new(action: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            package: package.into(),
        }
    }
}

impl fmt::Display for BindTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package, self.action)
    }
}

/// The surface the surrounding platform must provide.
///
/// `bind` returning `false` is a synchronous refusal, observable
/// immediately; any fault after acceptance arrives through the handoff
/// instead. The two are distinct failure categories and stay that way.
pub trait Platform: Send + Sync + 'static {
    /// Whether the named package is installed. A presence check only,
    /// never a connection attempt.
    fn has_package(&self, package: &str) -> bool;

    /// Issue a bind request for `target`. On acceptance the platform keeps
    /// the notifier and fulfills it once the service connects; dropping it
    /// unfulfilled interrupts the waiter.
    fn bind(&self, target: &BindTarget, notifier: Notifier) -> bool;

    /// Tear down a binding previously accepted for `target`.
    fn unbind(&self, target: &BindTarget);
}

/// Fails with `PackageMissing` when the named provider is absent.
pub fn resolve_package(platform: &dyn Platform, package: &str) -> Result<()> {
    if platform.has_package(package) {
        Ok(())
    } else {
        Err(Error::PackageMissing(package.to_string()))
    }
}

/// Single-slot handoff between the platform's connected notification and
/// the waiter suspended on it.
pub struct Handoff;

impl Handoff {
    pub fn channel() -> (Notifier, Waiter) {
        let (tx, rx) = oneshot::channel();
        (Notifier { tx }, Waiter { rx })
    }
}

/// Fulfilling end of the handoff, owned by the platform after a bind is
/// accepted.
pub struct Notifier {
    tx: oneshot::Sender<Arc<dyn Transport>>,
}

impl Notifier {
    /// Deliver the connected transport. Consumes the notifier; a handoff is
    /// fulfilled at most once.
    pub fn connected(self, transport: Arc<dyn Transport>) {
        // the waiter may already be gone
        let _ = self.tx.send(transport);
    }
}

/// Waiting end of the handoff, owned by the exchange.
pub struct Waiter {
    rx: oneshot::Receiver<Arc<dyn Transport>>,
}

impl Waiter {
    /// Suspend until the platform delivers the transport. A notifier
    /// dropped unfulfilled surfaces as `Interrupted`, never a retry.
    pub async fn wait(self) -> Result<Arc<dyn Transport>> {
        self.rx.await.map_err(|_| {
            Error::Interrupted("connection handoff dropped before a handle arrived".to_string())
        })
    }
}

/// Scoped teardown for an accepted bind.
///
/// Dropping the guard unbinds exactly once, whichever path the exchange
/// exits through. A refused bind never creates one.
pub struct Binding {
    platform: Arc<dyn Platform>,
    target: BindTarget,
}

impl Binding {
    fn new(platform: Arc<dyn Platform>, target: BindTarget) -> Self {
        Self { platform, target }
    }

    pub fn target(&self) -> &BindTarget {
        &self.target
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.platform.unbind(&self.target);
    }
}

/// Bind to `target` and block until the transport handle arrives.
///
/// A synchronous refusal returns `Refused` before any binding exists; an
/// abandoned wait returns `Interrupted` after the guard has already
/// released the partial bind.
pub async fn connect(
    platform: &Arc<dyn Platform>,
    target: BindTarget,
) -> Result<(Binding, Arc<dyn Transport>)> {
    let (notifier, waiter) = Handoff::channel();
    if !platform.bind(&target, notifier) {
        return Err(Error::Refused);
    }

    let binding = Binding::new(Arc::clone(platform), target);
    tracing::debug!(service = %binding.target(), "bind accepted, waiting for connection");

    let transport = waiter.wait().await?;
    Ok((binding, transport))
}
