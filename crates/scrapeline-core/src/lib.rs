//! scrapeline core: an in-process metrics registry.
//!
//! Counters, gauges and histograms are registered once into a [`Registry`],
//! fanned out into labeled series on first use, and rendered on demand in the
//! Prometheus text exposition format by [`TextEncoder`]. The crate carries no
//! runtime or transport dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every fallible call
//! returns [`MetricsError`]; rendering never fails.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod descriptor;
pub mod error;
pub mod exposition;
pub mod family;
pub mod registry;
pub mod series;
pub mod vec;

pub use descriptor::{MetricDescriptor, MetricKind, DEFAULT_BUCKETS};
pub use error::{MetricsError, Result};
pub use exposition::{TextEncoder, CONTENT_TYPE};
pub use family::MetricFamily;
pub use registry::Registry;
pub use series::{HistogramSnapshot, LabeledSeries, SeriesSample};
pub use vec::{CounterVec, GaugeVec, HistogramVec};
