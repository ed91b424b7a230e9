//! Typed handles over a registered family.
//!
//! Label values are passed positionally, in the order the label names were
//! declared at registration.

use std::sync::Arc;

use crate::error::Result;
use crate::family::MetricFamily;
use crate::series::LabeledSeries;

#[derive(Debug, Clone)]
pub struct CounterVec {
    family: Arc<MetricFamily>,
}

impl CounterVec {
    pub(crate) fn from_family(family: Arc<MetricFamily>) -> Self {
        Self { family }
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[&str]) -> Result<()> {
        self.inc_by(labels, 1.0)
    }

    /// Increment by a non-negative amount.
    pub fn inc_by(&self, labels: &[&str], delta: f64) -> Result<()> {
        self.family.get_or_create_series(labels)?.inc_by(delta)
    }

    pub fn with_label_values(&self, labels: &[&str]) -> Result<Arc<LabeledSeries>> {
        self.family.get_or_create_series(labels)
    }

    pub fn family(&self) -> &Arc<MetricFamily> {
        &self.family
    }
}

#[derive(Debug, Clone)]
pub struct GaugeVec {
    family: Arc<MetricFamily>,
}

impl GaugeVec {
    pub(crate) fn from_family(family: Arc<MetricFamily>) -> Self {
        Self { family }
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[&str]) -> Result<()> {
        self.add(labels, 1.0)
    }

    /// Decrement by 1.
    pub fn dec(&self, labels: &[&str]) -> Result<()> {
        self.sub(labels, 1.0)
    }

    /// Add an arbitrary signed delta.
    pub fn add(&self, labels: &[&str], delta: f64) -> Result<()> {
        self.family.get_or_create_series(labels)?.inc_by(delta)
    }

    pub fn sub(&self, labels: &[&str], delta: f64) -> Result<()> {
        self.family.get_or_create_series(labels)?.dec_by(delta)
    }

    pub fn set(&self, labels: &[&str], value: f64) -> Result<()> {
        self.family.get_or_create_series(labels)?.set(value)
    }

    pub fn with_label_values(&self, labels: &[&str]) -> Result<Arc<LabeledSeries>> {
        self.family.get_or_create_series(labels)
    }

    pub fn family(&self) -> &Arc<MetricFamily> {
        &self.family
    }
}

#[derive(Debug, Clone)]
pub struct HistogramVec {
    family: Arc<MetricFamily>,
}

impl HistogramVec {
    pub(crate) fn from_family(family: Arc<MetricFamily>) -> Self {
        Self { family }
    }

    pub fn observe(&self, labels: &[&str], value: f64) -> Result<()> {
        self.family.get_or_create_series(labels)?.observe(value)
    }

    pub fn with_label_values(&self, labels: &[&str]) -> Result<Arc<LabeledSeries>> {
        self.family.get_or_create_series(labels)
    }

    pub fn family(&self) -> &Arc<MetricFamily> {
        &self.family
    }
}
