//! Error type shared by the registry, families and series.

use thiserror::Error;

use crate::descriptor::MetricKind;

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error type for registry operations.
///
/// `DuplicateMetric` and `InvalidDescriptor` are configuration errors raised at
/// registration time and should abort startup. The remaining variants are
/// local to one call and never leave registry state modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("metric {name} already registered with an incompatible descriptor: {reason}")]
    DuplicateMetric { name: String, reason: String },

    #[error("metric {name} expects {expected} label values, got {got}")]
    LabelCardinality {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("invalid value {value} for metric {name}: {reason}")]
    InvalidMetricValue {
        name: String,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid descriptor for metric {name}: {reason}")]
    InvalidDescriptor { name: String, reason: String },

    #[error("metric {name} reached its limit of {limit} series")]
    SeriesLimitExceeded { name: String, limit: usize },

    #[error("metric {name} is a {actual}, cannot apply a {requested} operation")]
    KindMismatch {
        name: String,
        actual: MetricKind,
        requested: MetricKind,
    },
}
