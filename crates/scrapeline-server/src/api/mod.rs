//! Demo API endpoints producing request traffic and business events.

use std::any::Any;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rand::Rng;
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::obs::ServiceMetrics;

fn random_delay(range: [u64; 2]) -> Duration {
    Duration::from_millis(rand::thread_rng().gen_range(range[0]..=range[1]))
}

pub async fn home() -> Json<Value> {
    tracing::info!("home endpoint accessed");
    Json(json!({
        "message": "Welcome to the monitored scrapeline service",
        "endpoints": ["/metrics", "/health", "/api/data", "/api/slow", "/api/error"],
    }))
}

pub async fn health() -> Json<Value> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default();
    Json(json!({ "status": "healthy", "timestamp": timestamp }))
}

pub async fn data(State(state): State<AppState>) -> Json<Value> {
    state.metrics().business_event("data_request");

    tokio::time::sleep(random_delay(state.cfg().workload.data_delay_ms)).await;

    let items: Vec<Value> = {
        let mut rng = rand::thread_rng();
        (0..10)
            .map(|i| json!({ "id": i, "value": rng.gen_range(1..=100) }))
            .collect()
    };
    Json(json!({ "data": items }))
}

pub async fn slow(State(state): State<AppState>) -> Json<Value> {
    state.metrics().business_event("slow_request");

    let delay = random_delay(state.cfg().workload.slow_delay_ms);
    tokio::time::sleep(delay).await;

    Json(json!({ "processed": true, "duration": delay.as_secs_f64() }))
}

pub async fn error(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics().business_event("error_test");

    let failed = rand::thread_rng().gen_bool(state.cfg().workload.error_rate);
    if failed {
        state.metrics().app_error("random_error");
        tracing::error!("random error occurred");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Random error occurred" })),
        );
    }

    (StatusCode::OK, Json(json!({ "success": true })))
}

pub async fn not_found(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics().app_error("not_found");
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Response for a handler that panicked.
pub fn internal_error(metrics: &ServiceMetrics, panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };

    metrics.app_error("internal_error");
    tracing::error!(%detail, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}
