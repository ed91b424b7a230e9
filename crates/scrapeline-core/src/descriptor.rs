//! Metric identity: name, help, kind, label names and histogram buckets.

use std::fmt;

use crate::error::{MetricsError, Result};

/// Default histogram buckets (seconds), ending in the `+Inf` sentinel.
pub const DEFAULT_BUCKETS: [f64; 15] = [
    0.005,
    0.01,
    0.025,
    0.05,
    0.075,
    0.1,
    0.25,
    0.5,
    0.75,
    1.0,
    2.5,
    5.0,
    7.5,
    10.0,
    f64::INFINITY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    /// Name used on the `# TYPE` line.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable identity of a metric family.
///
/// Construct with [`MetricDescriptor::counter`], [`MetricDescriptor::gauge`] or
/// [`MetricDescriptor::histogram`]; the registry validates it on registration.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDescriptor {
    name: String,
    help: String,
    kind: MetricKind,
    label_names: Vec<String>,
    buckets: Vec<f64>,
}

impl MetricDescriptor {
    fn new(name: &str, help: &str, kind: MetricKind, label_names: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            kind,
            label_names: label_names.iter().map(|l| l.to_string()).collect(),
            buckets: Vec::new(),
        }
    }

    pub fn counter(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self::new(name, help, MetricKind::Counter, label_names)
    }

    pub fn gauge(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self::new(name, help, MetricKind::Gauge, label_names)
    }

    /// Histogram with the given upper bounds. A trailing `+Inf` is appended
    /// when missing. An empty slice selects [`DEFAULT_BUCKETS`].
    pub fn histogram(name: &str, help: &str, label_names: &[&str], buckets: &[f64]) -> Self {
        let mut d = Self::new(name, help, MetricKind::Histogram, label_names);
        d.buckets = if buckets.is_empty() {
            DEFAULT_BUCKETS.to_vec()
        } else {
            buckets.to_vec()
        };
        if d.buckets.last().is_some_and(|b| *b != f64::INFINITY) {
            d.buckets.push(f64::INFINITY);
        }
        d
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    /// Histogram upper bounds including the `+Inf` sentinel; empty for
    /// counters and gauges.
    pub fn buckets(&self) -> &[f64] {
        &self.buckets
    }

    /// Check names and bucket layout.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_metric_name(&self.name) {
            return Err(self.invalid(format!("{:?} is not a valid metric name", self.name)));
        }

        for (i, label) in self.label_names.iter().enumerate() {
            if !is_valid_label_name(label) {
                return Err(self.invalid(format!("{label:?} is not a valid label name")));
            }
            if self.label_names[..i].contains(label) {
                return Err(self.invalid(format!("duplicate label name {label:?}")));
            }
            if self.kind == MetricKind::Histogram && label == "le" {
                return Err(self.invalid("label \"le\" is reserved for histogram buckets".into()));
            }
        }

        if self.kind == MetricKind::Histogram {
            // at least one finite bound plus +Inf
            if self.buckets.len() < 2 {
                return Err(self.invalid("histogram needs at least one finite bucket".into()));
            }
            let finite = &self.buckets[..self.buckets.len() - 1];
            if finite.iter().any(|b| !b.is_finite()) {
                return Err(self.invalid("bucket bounds must be finite".into()));
            }
            if finite.windows(2).any(|w| w[0] >= w[1]) {
                return Err(self.invalid("bucket bounds must be strictly ascending".into()));
            }
        }
        Ok(())
    }

    /// Why `other` cannot share a name with `self`, if it cannot.
    ///
    /// Help text is not part of the identity.
    pub fn conflict_with(&self, other: &MetricDescriptor) -> Option<String> {
        if self.kind != other.kind {
            return Some(format!("kind {} != {}", self.kind, other.kind));
        }
        if self.label_names != other.label_names {
            return Some(format!(
                "label names {:?} != {:?}",
                self.label_names, other.label_names
            ));
        }
        if self.buckets != other.buckets {
            return Some(format!("buckets {:?} != {:?}", self.buckets, other.buckets));
        }
        None
    }

    fn invalid(&self, reason: String) -> MetricsError {
        MetricsError::InvalidDescriptor {
            name: self.name.clone(),
            reason,
        }
    }
}

fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn is_valid_label_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
