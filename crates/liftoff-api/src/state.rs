//! API application state: the owned connection slot and its connector.

use liftoff_store::{SharedConnector, SharedStore};
use tokio::sync::RwLock;

/// Shared state for the HTTP surface.
///
/// The connection slot replaces the original service's lazily-initialised
/// global handle: it is created once at process start, owned here, and
/// handed to request handlers through the guard middleware.
pub struct ApiState {
    connector: SharedConnector,
    slot: RwLock<Option<SharedStore>>,
}

impl ApiState {
    /// Build state with an empty connection slot; the guard connects lazily
    /// on the first data-touching request.
    #[must_use]
    pub fn new(connector: SharedConnector) -> Self {
        Self {
            connector,
            slot: RwLock::new(None),
        }
    }

    /// Build state seeded with an already-connected store.
    #[must_use]
    pub fn with_store(connector: SharedConnector, store: SharedStore) -> Self {
        Self {
            connector,
            slot: RwLock::new(Some(store)),
        }
    }

    /// Clone the currently held store handle, if any.
    pub async fn held_store(&self) -> Option<SharedStore> {
        self.slot.read().await.clone()
    }

    pub(crate) fn connector(&self) -> &SharedConnector {
        &self.connector
    }

    pub(crate) async fn install_store(&self, store: SharedStore) {
        *self.slot.write().await = Some(store);
    }

    pub(crate) async fn clear_store(&self) {
        *self.slot.write().await = None;
    }

    /// Take the held store out of the slot and release its connection.
    pub async fn close_store(&self) {
        let store = self.slot.write().await.take();
        if let Some(store) = store {
            store.close().await;
        }
    }
}
