//! Health/info/root handlers (spec.md §6): these carry the same
//! `{success, data, meta}` envelope as every other route rather than a
//! bespoke liveness shape, so a caller never has to special-case them.

use std::time::Instant;

use axum::extract::State;
use axum::response::Response;
use serde_json::json;

use crate::envelope::ok;
use crate::state::AppState;

/// `GET /api/health`.
pub async fn health(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let store_healthy = state.store.list_cities().await.is_ok();
    ok(
        json!({
            "status": if store_healthy { "healthy" } else { "degraded" },
            "store": store_healthy,
            "environment": format!("{:?}", state.config.environment),
            "scheduled_jobs_enabled": state.config.enable_scheduled_jobs,
        }),
        start,
    )
}

/// `GET /api/info`.
pub async fn info() -> Response {
    let start = Instant::now();
    ok(
        json!({
            "name": "compliance-intelligence-service",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Regulatory-compliance risk scoring, OSINT enrichment and report generation",
        }),
        start,
    )
}

/// `GET /`.
pub async fn root() -> Response {
    let start = Instant::now();
    ok(json!({ "service": "compliance-intelligence-service" }), start)
}
