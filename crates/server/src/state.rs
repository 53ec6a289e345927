//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::Store;
use crate::extraction::GiftExtractor;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Storage and extraction are held as trait
/// objects so the same router runs against `PostgreSQL` and the live
/// extractor in production, or in-memory fakes in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Arc<dyn Store>,
    extractor: Arc<dyn GiftExtractor>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn Store>,
        extractor: Arc<dyn GiftExtractor>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                extractor,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// Get a reference to the URL extractor.
    #[must_use]
    pub fn extractor(&self) -> &dyn GiftExtractor {
        self.inner.extractor.as_ref()
    }
}
