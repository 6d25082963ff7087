//! Service context - dependency container for the pipeline stages

use std::sync::Arc;

use audit_core::{KeyValueStore, Platform};

/// Collaborators shared by every stage
///
/// Cloning is cheap; each spawned event handler gets its own copy.
#[derive(Clone)]
pub struct ServiceContext {
    platform: Arc<dyn Platform>,
    store: Arc<dyn KeyValueStore>,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(platform: Arc<dyn Platform>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { platform, store }
    }

    /// Get the platform capability
    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    /// Get the key/value store
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("platform", &"dyn Platform")
            .field("store", &"dyn KeyValueStore")
            .finish()
    }
}
