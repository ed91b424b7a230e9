//! Axum middleware wrapping every route with request metrics.

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

/// Route label used when no route matched (404 fallback).
pub const UNMATCHED_ROUTE: &str = "unknown";

pub async fn track_requests(
    State(state): State<AppState>,
    matched: Option<MatchedPath>,
    req: Request,
    next: Next,
) -> Response {
    let route = matched
        .as_ref()
        .map(|m| m.as_str())
        .unwrap_or(UNMATCHED_ROUTE);
    let http = &state.metrics().http;
    let ctx = http.begin(req.method().as_str(), route);

    let res = next.run(req).await;

    http.finish(ctx, res.status().as_u16());
    res
}
