//! Registry of metric families keyed by name.

use std::sync::{Arc, OnceLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::descriptor::MetricDescriptor;
use crate::error::{MetricsError, Result};
use crate::family::MetricFamily;
use crate::vec::{CounterVec, GaugeVec, HistogramVec};

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Collection of metric families.
///
/// Usually built once at startup and shared behind an `Arc`. Tests build
/// their own isolated instances; [`Registry::global`] exists for setups that
/// want a single process-wide default.
#[derive(Debug, Default)]
pub struct Registry {
    families: DashMap<String, Arc<MetricFamily>>,
    series_limit: Option<usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose families refuse to grow past `limit` series each.
    pub fn with_series_limit(limit: usize) -> Self {
        Self {
            families: DashMap::new(),
            series_limit: Some(limit),
        }
    }

    /// Process-wide default registry.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Register a family, or return the existing one when the descriptor is
    /// compatible with what is already registered under that name.
    pub fn register(&self, desc: MetricDescriptor) -> Result<Arc<MetricFamily>> {
        desc.validate()?;

        match self.families.entry(desc.name().to_string()) {
            Entry::Occupied(e) => {
                let existing = e.get();
                if let Some(reason) = existing.descriptor().conflict_with(&desc) {
                    tracing::error!(metric = %desc.name(), %reason, "conflicting metric registration");
                    return Err(MetricsError::DuplicateMetric {
                        name: desc.name().to_string(),
                        reason,
                    });
                }
                if existing.descriptor().help() != desc.help() {
                    tracing::warn!(metric = %desc.name(), "re-registered with different help text, keeping the first");
                }
                Ok(Arc::clone(existing))
            }
            Entry::Vacant(e) => {
                tracing::debug!(metric = %desc.name(), kind = %desc.kind(), labels = ?desc.label_names(), "metric registered");
                let family = Arc::new(MetricFamily::new(desc, self.series_limit));
                e.insert(Arc::clone(&family));
                Ok(family)
            }
        }
    }

    pub fn register_counter(&self, name: &str, help: &str, label_names: &[&str]) -> Result<CounterVec> {
        self.register(MetricDescriptor::counter(name, help, label_names))
            .map(CounterVec::from_family)
    }

    pub fn register_gauge(&self, name: &str, help: &str, label_names: &[&str]) -> Result<GaugeVec> {
        self.register(MetricDescriptor::gauge(name, help, label_names))
            .map(GaugeVec::from_family)
    }

    /// Empty `buckets` selects the default bucket layout.
    pub fn register_histogram(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
        buckets: &[f64],
    ) -> Result<HistogramVec> {
        self.register(MetricDescriptor::histogram(name, help, label_names, buckets))
            .map(HistogramVec::from_family)
    }

    pub fn get(&self, name: &str) -> Option<Arc<MetricFamily>> {
        self.families.get(name).map(|r| Arc::clone(r.value()))
    }

    /// Snapshot of all families, sorted by name.
    pub fn families(&self) -> Vec<Arc<MetricFamily>> {
        let mut out: Vec<Arc<MetricFamily>> =
            self.families.iter().map(|r| Arc::clone(r.value())).collect();
        out.sort_by(|a, b| a.name().cmp(b.name()));
        out
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}
