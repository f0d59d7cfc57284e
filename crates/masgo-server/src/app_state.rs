//! Shared application state for the masgo server.
//!
//! The store is constructed here, once, and handed to handlers through axum
//! state; there is no process-wide singleton.

use std::sync::Arc;

use masgo_core::{MemStorage, Repository};

use crate::config::ServerConfig;
use crate::obs::metrics::ServerMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    store: Arc<dyn Repository>,
    metrics: Arc<ServerMetrics>,
}

struct AppStateInner {
    cfg: ServerConfig,
}

impl AppState {
    /// Build application state around a fresh in-memory store.
    pub fn new(cfg: ServerConfig) -> Self {
        Self::with_store(cfg, Arc::new(MemStorage::new()))
    }

    /// Build application state around an existing repository.
    pub fn with_store(cfg: ServerConfig, store: Arc<dyn Repository>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg }),
            store,
            metrics: Arc::new(ServerMetrics::default()),
        }
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> Arc<dyn Repository> {
        Arc::clone(&self.store)
    }

    pub fn metrics(&self) -> Arc<ServerMetrics> {
        Arc::clone(&self.metrics)
    }
}
