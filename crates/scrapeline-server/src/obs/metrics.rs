//! Metric handles registered by the service.
//!
//! Updates happen on the request path, so a rejected update is logged and
//! dropped instead of failing the request.

use std::time::Instant;

use scrapeline_core::{CounterVec, GaugeVec, HistogramVec, MetricsError, Registry};

use crate::config::MetricsSection;
use crate::error::Result;

fn log_rejected(res: std::result::Result<(), MetricsError>) {
    if let Err(e) = res {
        tracing::warn!(error = %e, "metric update rejected");
    }
}

/// Per-request state carried from request start to completion.
///
/// Dropping the context (on completion or when the request future is
/// cancelled) decrements the in-flight gauge.
#[derive(Debug)]
pub struct RequestContext {
    method: String,
    route: String,
    started: Instant,
    active: GaugeVec,
}

impl Drop for RequestContext {
    fn drop(&mut self) {
        log_rejected(self.active.dec(&[]));
    }
}

/// Request traffic metrics.
#[derive(Debug, Clone)]
pub struct HttpMetrics {
    requests_total: CounterVec,
    request_duration: HistogramVec,
    requests_active: GaugeVec,
}

impl HttpMetrics {
    pub fn register(registry: &Registry, duration_buckets: &[f64]) -> Result<Self> {
        Ok(Self {
            requests_total: registry.register_counter(
                "http_requests_total",
                "Total HTTP requests",
                &["method", "route", "status"],
            )?,
            request_duration: registry.register_histogram(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "route"],
                duration_buckets,
            )?,
            requests_active: registry.register_gauge(
                "http_requests_active",
                "Number of active HTTP requests",
                &[],
            )?,
        })
    }

    /// Mark a request as in flight and start its clock.
    pub fn begin(&self, method: &str, route: &str) -> RequestContext {
        log_rejected(self.requests_active.inc(&[]));
        RequestContext {
            method: method.to_string(),
            route: route.to_string(),
            started: Instant::now(),
            active: self.requests_active.clone(),
        }
    }

    /// Record duration and outcome. The in-flight gauge is released when
    /// `ctx` drops at the end of this call.
    pub fn finish(&self, ctx: RequestContext, status: u16) {
        let elapsed = ctx.started.elapsed().as_secs_f64();
        let (method, route) = (ctx.method.as_str(), ctx.route.as_str());
        log_rejected(self.request_duration.observe(&[method, route], elapsed));
        let status = status.to_string();
        log_rejected(self.requests_total.inc(&[method, route, status.as_str()]));
    }
}

/// Every metric the service exposes.
#[derive(Debug, Clone)]
pub struct ServiceMetrics {
    pub http: HttpMetrics,
    business_events: CounterVec,
    app_errors: CounterVec,
}

impl ServiceMetrics {
    pub fn register(registry: &Registry, cfg: &MetricsSection) -> Result<Self> {
        Ok(Self {
            http: HttpMetrics::register(registry, &cfg.duration_buckets)?,
            business_events: registry.register_counter(
                "business_events_total",
                "Total business events",
                &["event_type"],
            )?,
            app_errors: registry.register_counter(
                "application_errors_total",
                "Total application errors",
                &["error_type"],
            )?,
        })
    }

    pub fn business_event(&self, event_type: &str) {
        log_rejected(self.business_events.inc(&[event_type]));
    }

    pub fn app_error(&self, error_type: &str) {
        log_rejected(self.app_errors.inc(&[error_type]));
    }
}
