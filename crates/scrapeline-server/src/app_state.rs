//! Shared application state for the scrapeline server.
//!
//! The registry is built here and handed to every handler through axum
//! state; nothing in the server reaches for a global registry.

use std::sync::Arc;

use scrapeline_core::Registry;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::obs::ServiceMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    registry: Arc<Registry>,
}

struct AppStateInner {
    cfg: ServerConfig,
    metrics: ServiceMetrics,
}

impl AppState {
    /// Build state with a fresh registry sized by `cfg.metrics`.
    /// Returns Result so main can report registration conflicts.
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        let registry = match cfg.metrics.max_series_per_family {
            Some(limit) => Registry::with_series_limit(limit),
            None => Registry::new(),
        };
        Self::with_registry(cfg, Arc::new(registry))
    }

    /// Build state on top of an existing registry, registering the service
    /// metrics into it. `cfg` is validated again since its fields are public.
    pub fn with_registry(cfg: ServerConfig, registry: Arc<Registry>) -> Result<Self> {
        cfg.validate()?;
        let metrics = ServiceMetrics::register(&registry, &cfg.metrics)?;
        tracing::debug!(families = registry.len(), "service metrics registered");

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, metrics }),
            registry,
        })
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.inner.metrics
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }
}
