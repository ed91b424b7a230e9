//! scrapeline server library entry.
//!
//! Wires the metrics registry into an axum application: config loading,
//! shared state, request instrumentation, the scrape endpoint and a handful
//! of demo endpoints that generate traffic. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod obs;
pub mod ops;
pub mod router;
