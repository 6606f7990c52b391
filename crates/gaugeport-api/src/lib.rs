//! gaugeport-api — HTTP surface of the exporter.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `exposition.metrics_path` (default `/metrics`) | Prometheus exposition |
//! | GET | `/` | Prometheus exposition |
//! | GET | `/healthz` | Liveness, never touches the store |
//!
//! The exposition routes answer `200` when every lookup succeeded and
//! `500` when any failed. The body carries every collected line either way.

pub mod handlers;

use axum::Router;
use axum::routing::get;
use gaugeport_collector::Collector;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub collector: Collector,
}

/// Build the exporter router.
pub fn build_router(collector: Collector) -> Router {
    let metrics_path = collector.config().exposition.metrics_path.clone();
    let state = ApiState { collector };

    let mut router = Router::new()
        .route("/", get(handlers::scrape))
        .route("/healthz", get(handlers::healthz));
    if metrics_path != "/" && metrics_path != "/healthz" {
        router = router.route(&metrics_path, get(handlers::scrape));
    }
    router.with_state(state)
}
