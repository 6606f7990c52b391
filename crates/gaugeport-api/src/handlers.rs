//! Scrape and health handlers.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use tracing::debug;

use gaugeport_core::{render, ScrapeStatus, CONTENT_TYPE};

use crate::ApiState;

/// GET /metrics
///
/// Runs one full collection and renders it. Degraded scrapes answer 500
/// with whatever was collected.
pub async fn scrape(State(state): State<ApiState>) -> impl IntoResponse {
    let result = state.collector.scrape().await;
    let body = render(&result);
    let status = match result.status {
        ScrapeStatus::Ok => StatusCode::OK,
        ScrapeStatus::PartialFailure => StatusCode::INTERNAL_SERVER_ERROR,
    };
    debug!(%status, bytes = body.len(), "scrape served");

    (status, [(header::CONTENT_TYPE, CONTENT_TYPE)], body)
}

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
