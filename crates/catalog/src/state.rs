//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::CatalogConfig;
use crate::db::ProductStore;
use crate::services::BlobUploader;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the two external
/// collaborators (product store, image uploader) behind trait objects so
/// tests can substitute in-memory doubles.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CatalogConfig,
    store: Arc<dyn ProductStore>,
    uploader: Arc<dyn BlobUploader>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: CatalogConfig,
        store: Arc<dyn ProductStore>,
        uploader: Arc<dyn BlobUploader>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                uploader,
            }),
        }
    }

    /// Get a reference to the catalog configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    /// Get a reference to the product store.
    #[must_use]
    pub fn store(&self) -> &dyn ProductStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the image uploader.
    #[must_use]
    pub fn uploader(&self) -> &dyn BlobUploader {
        self.inner.uploader.as_ref()
    }
}
