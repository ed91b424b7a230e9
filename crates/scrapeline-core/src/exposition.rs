//! Prometheus text exposition rendering.
//!
//! Families are emitted in name order and series in label-value order, so
//! two renders of an unchanged registry are byte-identical.

use std::fmt::Write;

use bytes::Bytes;

use crate::family::MetricFamily;
use crate::registry::Registry;
use crate::series::{HistogramSnapshot, SeriesSample};

/// Content type of the rendered body.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Stateless encoder for the text exposition format.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextEncoder;

impl TextEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, registry: &Registry) -> Bytes {
        Bytes::from(self.render_to_string(registry))
    }

    pub fn render_to_string(&self, registry: &Registry) -> String {
        let mut out = String::new();
        for family in registry.families() {
            render_family(&family, &mut out);
        }
        out
    }
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Render a sample value. Integral values print without a fraction.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{v}")
    }
}

/// `{a="x",b="y"}`, or nothing when there are no pairs.
fn label_block(names: &[String], values: &[String], le: Option<&str>) -> String {
    let mut pairs: Vec<String> = names
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect();
    if let Some(le) = le {
        pairs.push(format!("le=\"{le}\""));
    }
    if pairs.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", pairs.join(","))
    }
}

fn render_family(family: &MetricFamily, out: &mut String) {
    let desc = family.descriptor();
    let name = desc.name();
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(desc.help()));
    let _ = writeln!(out, "# TYPE {} {}", name, desc.kind());

    for series in family.series() {
        let values = series.label_values();
        match series.sample() {
            SeriesSample::Scalar(v) => {
                let labels = label_block(desc.label_names(), values, None);
                let _ = writeln!(out, "{}{} {}", name, labels, format_value(v));
            }
            SeriesSample::Histogram(h) => {
                render_histogram(name, desc.label_names(), values, &h, out);
            }
        }
    }
}

fn render_histogram(
    name: &str,
    label_names: &[String],
    values: &[String],
    h: &HistogramSnapshot,
    out: &mut String,
) {
    for (bound, count) in &h.buckets {
        let le = format_value(*bound);
        let labels = label_block(label_names, values, Some(&le));
        let _ = writeln!(out, "{}_bucket{} {}", name, labels, count);
    }
    let labels = label_block(label_names, values, None);
    let _ = writeln!(out, "{}_sum{} {}", name, labels, format_value(h.sum));
    let _ = writeln!(out, "{}_count{} {}", name, labels, h.count);
}
