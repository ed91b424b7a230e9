use std::net::SocketAddr;

use serde::Deserialize;

use crate::error::{Result, ServerError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub workload: WorkloadSection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
            workload: WorkloadSection::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ServerError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.metrics.validate()?;
        self.workload.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            ServerError::Config(format!(
                "server.listen must be a valid SocketAddr, got {:?}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_metrics_path")]
    pub path: String,

    /// Per-family cap on distinct label sets. Unlimited when absent.
    #[serde(default)]
    pub max_series_per_family: Option<usize>,

    /// Upper bounds (seconds) for the request duration histogram.
    #[serde(default = "default_duration_buckets")]
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            max_series_per_family: None,
            duration_buckets: default_duration_buckets(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(ServerError::Config("metrics.path must start with '/'".into()));
        }
        if crate::router::FIXED_ROUTES.contains(&self.path.as_str()) {
            return Err(ServerError::Config(format!(
                "metrics.path {} collides with a built-in route",
                self.path
            )));
        }
        if self.max_series_per_family == Some(0) {
            return Err(ServerError::Config(
                "metrics.max_series_per_family must be at least 1".into(),
            ));
        }
        if self.duration_buckets.is_empty() {
            return Err(ServerError::Config("metrics.duration_buckets must not be empty".into()));
        }
        if self.duration_buckets.iter().any(|b| !b.is_finite()) {
            return Err(ServerError::Config("metrics.duration_buckets must be finite".into()));
        }
        if self.duration_buckets.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ServerError::Config(
                "metrics.duration_buckets must be strictly ascending".into(),
            ));
        }
        Ok(())
    }
}

fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_duration_buckets() -> Vec<f64> {
    scrapeline_core::DEFAULT_BUCKETS[..scrapeline_core::DEFAULT_BUCKETS.len() - 1].to_vec()
}

/// Simulated work done by the demo API endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkloadSection {
    /// `[min, max]` sleep for `/api/data`.
    #[serde(default = "default_data_delay_ms")]
    pub data_delay_ms: [u64; 2],

    /// `[min, max]` sleep for `/api/slow`.
    #[serde(default = "default_slow_delay_ms")]
    pub slow_delay_ms: [u64; 2],

    /// Probability that `/api/error` fails.
    #[serde(default = "default_error_rate")]
    pub error_rate: f64,
}

impl Default for WorkloadSection {
    fn default() -> Self {
        Self {
            data_delay_ms: default_data_delay_ms(),
            slow_delay_ms: default_slow_delay_ms(),
            error_rate: default_error_rate(),
        }
    }
}

impl WorkloadSection {
    pub fn validate(&self) -> Result<()> {
        if self.data_delay_ms[0] > self.data_delay_ms[1] {
            return Err(ServerError::Config(
                "workload.data_delay_ms must be [min, max] with min <= max".into(),
            ));
        }
        if self.slow_delay_ms[0] > self.slow_delay_ms[1] {
            return Err(ServerError::Config(
                "workload.slow_delay_ms must be [min, max] with min <= max".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.error_rate) {
            return Err(ServerError::Config(
                "workload.error_rate must be between 0 and 1".into(),
            ));
        }
        Ok(())
    }
}

fn default_data_delay_ms() -> [u64; 2] {
    [10, 100]
}
fn default_slow_delay_ms() -> [u64; 2] {
    [500, 2000]
}
fn default_error_rate() -> f64 {
    0.3
}
