//! `/jobs*` handlers (spec.md §4.4, §6): list the three named jobs and
//! manually trigger/start/stop one by name. `trigger` walks the same
//! execution path the cron loop uses (spec.md §9).

use std::time::Instant;

use axum::extract::{Path, State};
use axum::response::Response;
use ci_scheduler::SchedulerError;

use crate::envelope::ok;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `GET /jobs` (spec.md §6).
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let start = Instant::now();
    let jobs = state.scheduler.list().await;
    Ok(ok(jobs, start))
}

/// An unknown job name is the caller's mistake, not a missing resource
/// (spec.md §8 testable property 9: "`trigger` of an unknown name
/// returns 400"), so `SchedulerError::UnknownJob` is mapped to
/// `ApiError::Validation` here instead of going through the blanket
/// `CoreError::NotFound -> 404` conversion the rest of the API uses.
fn map_scheduler_error(err: SchedulerError) -> ApiError {
    match err {
        SchedulerError::UnknownJob(name) => ApiError::validation(format!("unknown job: {name}")),
    }
}

/// `POST /jobs/:name/trigger`.
pub async fn trigger(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Response> {
    let start = Instant::now();
    let outcome = state.scheduler.trigger(&name).await.map_err(map_scheduler_error)?;
    Ok(ok(
        serde_json::json!({
            "status": outcome.status,
            "records_processed": outcome.records_processed,
            "errors": outcome.errors,
        }),
        start,
    ))
}

/// `POST /jobs/:name/start`.
pub async fn start(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Response> {
    let start_time = Instant::now();
    state.scheduler.start_job(&name).map_err(map_scheduler_error)?;
    Ok(ok(serde_json::json!({ "name": name, "enabled": true }), start_time))
}

/// `POST /jobs/:name/stop`.
pub async fn stop(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Response> {
    let start = Instant::now();
    state.scheduler.stop_job(&name).map_err(map_scheduler_error)?;
    Ok(ok(serde_json::json!({ "name": name, "enabled": false }), start))
}
