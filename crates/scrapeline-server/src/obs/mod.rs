//! Request instrumentation on top of the scrapeline registry.
//!
//! `metrics` owns the service's metric handles; `middleware` feeds them from
//! every request passing through the router.

pub mod metrics;
pub mod middleware;

pub use metrics::{HttpMetrics, RequestContext, ServiceMetrics};
pub use middleware::track_requests;
