//! One labeled time series and its accumulator.
//!
//! Counters and gauges are a single `f64` stored as bits in an `AtomicU64` and
//! updated with a CAS loop, so request tasks and the scrape path never block
//! each other. Histograms keep per-bucket (non-cumulative) counts, the sum and
//! the count behind one small per-series mutex; a reader always sees a whole
//! observation or none of it. Cumulative bucket counts are produced at read
//! time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::descriptor::MetricKind;
use crate::error::{MetricsError, Result};

#[derive(Debug, Default)]
struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    fn set(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Release);
    }

    fn add(&self, delta: f64) {
        let mut cur = self.bits.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(cur) + delta).to_bits();
            match self
                .bits
                .compare_exchange_weak(cur, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => cur = actual,
            }
        }
    }
}

#[derive(Debug)]
struct HistogramState {
    counts: Vec<u64>,
    sum: f64,
    count: u64,
}

#[derive(Debug)]
struct HistogramCell {
    bounds: Arc<[f64]>,
    state: Mutex<HistogramState>,
}

impl HistogramCell {
    fn new(bounds: Arc<[f64]>) -> Self {
        let state = HistogramState {
            counts: vec![0; bounds.len()],
            sum: 0.0,
            count: 0,
        };
        Self {
            bounds,
            state: Mutex::new(state),
        }
    }

    fn observe(&self, v: f64) {
        // +Inf is always last, so a finite v always lands somewhere
        let idx = self
            .bounds
            .iter()
            .position(|b| v <= *b)
            .unwrap_or(self.bounds.len() - 1);

        let mut st = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        st.counts[idx] += 1;
        st.sum += v;
        st.count += 1;
    }

    fn snapshot(&self) -> HistogramSnapshot {
        let (counts, sum, count) = {
            let st = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            (st.counts.clone(), st.sum, st.count)
        };

        let mut acc = 0u64;
        let buckets = self
            .bounds
            .iter()
            .zip(counts)
            .map(|(bound, c)| {
                acc += c;
                (*bound, acc)
            })
            .collect();

        HistogramSnapshot { buckets, sum, count }
    }
}

/// Point-in-time copy of a histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    /// `(upper_bound, cumulative_count)` in ascending bound order; the last
    /// bound is `+Inf` and its count equals `count`.
    pub buckets: Vec<(f64, u64)>,
    pub sum: f64,
    pub count: u64,
}

/// Value read from a series for export.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesSample {
    Scalar(f64),
    Histogram(HistogramSnapshot),
}

#[derive(Debug)]
enum Accumulator {
    Counter(AtomicF64),
    Gauge(AtomicF64),
    Histogram(HistogramCell),
}

/// One concrete label-value combination of a metric family.
#[derive(Debug)]
pub struct LabeledSeries {
    metric: Arc<str>,
    label_values: Vec<String>,
    acc: Accumulator,
}

impl LabeledSeries {
    pub(crate) fn counter(metric: Arc<str>, label_values: Vec<String>) -> Self {
        Self {
            metric,
            label_values,
            acc: Accumulator::Counter(AtomicF64::default()),
        }
    }

    pub(crate) fn gauge(metric: Arc<str>, label_values: Vec<String>) -> Self {
        Self {
            metric,
            label_values,
            acc: Accumulator::Gauge(AtomicF64::default()),
        }
    }

    pub(crate) fn histogram(metric: Arc<str>, label_values: Vec<String>, bounds: Arc<[f64]>) -> Self {
        Self {
            metric,
            label_values,
            acc: Accumulator::Histogram(HistogramCell::new(bounds)),
        }
    }

    pub fn label_values(&self) -> &[String] {
        &self.label_values
    }

    pub fn kind(&self) -> MetricKind {
        match self.acc {
            Accumulator::Counter(_) => MetricKind::Counter,
            Accumulator::Gauge(_) => MetricKind::Gauge,
            Accumulator::Histogram(_) => MetricKind::Histogram,
        }
    }

    /// Add `delta` to a counter or gauge.
    ///
    /// Counters reject negative deltas; both reject non-finite ones. A
    /// rejected call leaves the value untouched.
    pub fn inc_by(&self, delta: f64) -> Result<()> {
        match &self.acc {
            Accumulator::Counter(v) => {
                self.check_finite(delta)?;
                if delta < 0.0 {
                    return Err(self.invalid(delta, "counter increments must be non-negative"));
                }
                v.add(delta);
                Ok(())
            }
            Accumulator::Gauge(v) => {
                self.check_finite(delta)?;
                v.add(delta);
                Ok(())
            }
            Accumulator::Histogram(_) => Err(self.mismatch(MetricKind::Counter)),
        }
    }

    /// Subtract `delta` from a gauge.
    pub fn dec_by(&self, delta: f64) -> Result<()> {
        match &self.acc {
            Accumulator::Gauge(v) => {
                self.check_finite(delta)?;
                v.add(-delta);
                Ok(())
            }
            _ => Err(self.mismatch(MetricKind::Gauge)),
        }
    }

    /// Overwrite a gauge.
    pub fn set(&self, value: f64) -> Result<()> {
        match &self.acc {
            Accumulator::Gauge(v) => {
                self.check_finite(value)?;
                v.set(value);
                Ok(())
            }
            _ => Err(self.mismatch(MetricKind::Gauge)),
        }
    }

    /// Record one histogram observation.
    pub fn observe(&self, value: f64) -> Result<()> {
        match &self.acc {
            Accumulator::Histogram(h) => {
                self.check_finite(value)?;
                h.observe(value);
                Ok(())
            }
            _ => Err(self.mismatch(MetricKind::Histogram)),
        }
    }

    /// Current counter or gauge value; `None` for histograms.
    pub fn value(&self) -> Option<f64> {
        match &self.acc {
            Accumulator::Counter(v) | Accumulator::Gauge(v) => Some(v.get()),
            Accumulator::Histogram(_) => None,
        }
    }

    /// Consistent copy of a histogram; `None` for counters and gauges.
    pub fn histogram_snapshot(&self) -> Option<HistogramSnapshot> {
        match &self.acc {
            Accumulator::Histogram(h) => Some(h.snapshot()),
            _ => None,
        }
    }

    pub fn sample(&self) -> SeriesSample {
        match &self.acc {
            Accumulator::Counter(v) | Accumulator::Gauge(v) => SeriesSample::Scalar(v.get()),
            Accumulator::Histogram(h) => SeriesSample::Histogram(h.snapshot()),
        }
    }

    fn check_finite(&self, v: f64) -> Result<()> {
        if v.is_finite() {
            Ok(())
        } else {
            Err(self.invalid(v, "value must be finite"))
        }
    }

    fn invalid(&self, value: f64, reason: &'static str) -> MetricsError {
        MetricsError::InvalidMetricValue {
            name: self.metric.to_string(),
            value,
            reason,
        }
    }

    fn mismatch(&self, requested: MetricKind) -> MetricsError {
        MetricsError::KindMismatch {
            name: self.metric.to_string(),
            actual: self.kind(),
            requested,
        }
    }
}
