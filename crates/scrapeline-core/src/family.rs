//! A metric family: one descriptor fanned out into labeled series.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::descriptor::{MetricDescriptor, MetricKind};
use crate::error::{MetricsError, Result};
use crate::series::LabeledSeries;

/// Owns a descriptor and every series created for it.
///
/// Series are created lazily on first use and never removed. Lookups of an
/// existing series take a shard read lock only; creation takes the shard
/// write lock, so exactly one instance wins per label-value combination.
#[derive(Debug)]
pub struct MetricFamily {
    desc: MetricDescriptor,
    name: Arc<str>,
    bounds: Arc<[f64]>,
    series: DashMap<Vec<String>, Arc<LabeledSeries>>,
    series_count: AtomicUsize,
    series_limit: Option<usize>,
}

impl MetricFamily {
    /// Build a family for an already validated descriptor.
    pub(crate) fn new(desc: MetricDescriptor, series_limit: Option<usize>) -> Self {
        Self {
            name: Arc::from(desc.name()),
            bounds: Arc::from(desc.buckets()),
            desc,
            series: DashMap::new(),
            series_count: AtomicUsize::new(0),
            series_limit,
        }
    }

    pub fn descriptor(&self) -> &MetricDescriptor {
        &self.desc
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MetricKind {
        self.desc.kind()
    }

    /// Resolve `label_values` (one per label name, in declaration order) to
    /// its series, creating a zeroed one on first use.
    pub fn get_or_create_series(&self, label_values: &[&str]) -> Result<Arc<LabeledSeries>> {
        let expected = self.desc.label_names().len();
        if label_values.len() != expected {
            return Err(MetricsError::LabelCardinality {
                name: self.name.to_string(),
                expected,
                got: label_values.len(),
            });
        }

        let key: Vec<String> = label_values.iter().map(|v| v.to_string()).collect();
        if let Some(existing) = self.series.get(&key) {
            return Ok(Arc::clone(existing.value()));
        }

        match self.series.entry(key) {
            Entry::Occupied(e) => Ok(Arc::clone(e.get())),
            Entry::Vacant(e) => {
                self.reserve_slot()?;
                let series = Arc::new(self.new_series(e.key().clone()));
                e.insert(Arc::clone(&series));
                Ok(series)
            }
        }
    }

    /// Snapshot of all series ordered by label values.
    pub fn series(&self) -> Vec<Arc<LabeledSeries>> {
        let mut out: Vec<Arc<LabeledSeries>> =
            self.series.iter().map(|r| Arc::clone(r.value())).collect();
        out.sort_by(|a, b| a.label_values().cmp(b.label_values()));
        out
    }

    pub fn series_count(&self) -> usize {
        self.series_count.load(Ordering::Relaxed)
    }

    fn reserve_slot(&self) -> Result<()> {
        let Some(limit) = self.series_limit else {
            self.series_count.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        };
        self.series_count
            .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |n| (n < limit).then_some(n + 1))
            .map(|_| ())
            .map_err(|_| {
                tracing::warn!(metric = %self.name, limit, "series limit reached, dropping new label set");
                MetricsError::SeriesLimitExceeded {
                    name: self.name.to_string(),
                    limit,
                }
            })
    }

    fn new_series(&self, label_values: Vec<String>) -> LabeledSeries {
        let name = Arc::clone(&self.name);
        match self.desc.kind() {
            MetricKind::Counter => LabeledSeries::counter(name, label_values),
            MetricKind::Gauge => LabeledSeries::gauge(name, label_values),
            MetricKind::Histogram => {
                LabeledSeries::histogram(name, label_values, Arc::clone(&self.bounds))
            }
        }
    }
}
