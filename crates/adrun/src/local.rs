//! # In-Memory Platform
//!
//! A process-local stand-in for the package and service registry the
//! connection manager talks to. Useful for embedding and for driving the
//! full exchange in tests without any real IPC.
//!
//! Uses DashMap for concurrent access without global locking, so multiple
//! exchanges can resolve and bind simultaneously.

use std::sync::Arc;

use dashmap::DashMap;

use crate::connector::BindTarget;
use crate::connector::Notifier;
use crate::connector::Platform;
use crate::transport::Transport;

/// In-memory registry of installed packages and bindable service endpoints.
pub struct LocalPlatform {
    packages: DashMap<String, ()>,
    services: DashMap<BindTarget, Arc<dyn Transport>>,
}

impl LocalPlatform {
    pub fn new() -> Self {
        Self {
            packages: DashMap::new(),
            services: DashMap::new(),
        }
    }

    /// Mark a package as installed.
    pub fn add_package(&self, name: impl Into<String>) {
        self.packages.insert(name.into(), ());
    }

    /// Register the endpoint answering bind requests for `target`.
    pub fn add_service(&self, target: BindTarget, transport: Arc<dyn Transport>) {
        self.services.insert(target, transport);
    }
}

impl Default for LocalPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for LocalPlatform {
    fn has_package(&self, package: &str) -> bool {
        self.packages.contains_key(package)
    }

    fn bind(&self, target: &BindTarget, notifier: Notifier) -> bool {
        let Some(entry) = self.services.get(target) else {
            tracing::debug!(service = %target, "bind refused: no endpoint registered");
            return false;
        };
        let transport = Arc::clone(entry.value());

        // the connected notification arrives asynchronously, as it would
        // from a real platform dispatching on its own thread
        tokio::spawn(async move {
            notifier.connected(transport);
        });
        true
    }

    fn unbind(&self, target: &BindTarget) {
        tracing::debug!(service = %target, "binding released");
    }
}
