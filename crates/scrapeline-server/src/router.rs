//! Axum router wiring.
//!
//! Every route, including the 404 fallback and the scrape endpoint itself,
//! runs behind the request metrics middleware. Panics are turned into 500
//! responses inside that middleware so they are still counted.

use std::any::Any;

use axum::{middleware, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{api, app_state::AppState, obs, ops};

/// Paths served regardless of config; the metrics path may not reuse them.
pub const FIXED_ROUTES: [&str; 6] = ["/", "/health", "/healthz", "/api/data", "/api/slow", "/api/error"];

pub fn build_router(state: AppState) -> Router {
    instrument(routes(&state), state)
}

/// Route table without middleware.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(api::home))
        .route("/health", get(api::health))
        .route("/api/data", get(api::data))
        .route("/api/slow", get(api::slow))
        .route("/api/error", get(api::error))
        .route("/healthz", get(ops::healthz))
        .route(&state.cfg().metrics.path, get(ops::metrics))
        .fallback(api::not_found)
}

/// Wrap `router` with panic recovery and request metrics.
pub fn instrument(router: Router<AppState>, state: AppState) -> Router {
    let metrics = state.metrics().clone();

    router
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| {
            api::internal_error(&metrics, panic)
        }))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            obs::track_requests,
        ))
        .with_state(state)
}
