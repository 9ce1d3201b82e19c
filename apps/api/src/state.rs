use std::sync::Arc;

use crate::auth::credentials::Credentials;
use crate::storage::FileStorage;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub files: Arc<dyn FileStorage>,
    pub credentials: Credentials,
}

#[cfg(test)]
impl AppState {
    /// State backed by the in-memory store and file storage.
    pub fn for_tests() -> Self {
        Self::with_memory_store(Arc::new(crate::store::memory::MemoryStore::new()))
    }

    /// Same as `for_tests`, sharing a store the test keeps a handle to.
    pub fn with_memory_store(store: Arc<crate::store::memory::MemoryStore>) -> Self {
        use crate::storage::memory::MemoryFileStorage;

        Self {
            store,
            files: Arc::new(MemoryFileStorage::default()),
            credentials: Credentials::new("test-secret", 15, 4),
        }
    }
}
