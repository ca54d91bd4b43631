//! `/api/reports/*` handlers (spec.md §6): weekly/monthly/enforcement
//! report read-or-generate, a single-report lookup by id, the ranked
//! enforcement-targets view, and cross-kind history.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use chrono::{DateTime, Datelike, Duration, Utc};
use ci_types::ReportKind;
use serde::Deserialize;
use serde_json::json;

use crate::envelope::ok;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

fn parse_kind(raw: &str) -> ApiResult<ReportKind> {
    match raw {
        "weekly" => Ok(ReportKind::Weekly),
        "monthly" => Ok(ReportKind::Monthly),
        "enforcement" => Ok(ReportKind::Enforcement),
        other => Err(ApiError::validation(format!("unknown report type: {other}"))),
    }
}

fn weekly_period(now: DateTime<Utc>) -> String {
    let date = now.date_naive();
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    monday.format("%Y-%m-%d").to_string()
}

fn enforcement_period(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub generate: bool,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// `GET /api/reports/{weekly|monthly|enforcement}?generate=bool[&month=&year=]`.
pub async fn by_kind(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Response> {
    let start = Instant::now();
    let kind = parse_kind(&kind)?;
    let now = Utc::now();

    if query.generate {
        let report = match kind {
            ReportKind::Weekly => ci_reports::generate_weekly_report(state.store.as_ref(), now).await?,
            ReportKind::Monthly => {
                ci_reports::generate_monthly_report(
                    state.store.as_ref(),
                    &state.config.scoring,
                    now,
                    query.year,
                    query.month,
                )
                .await?
            }
            ReportKind::Enforcement => {
                ci_reports::generate_enforcement_report(state.store.as_ref(), &state.config.scoring, now).await?
            }
        };
        return Ok(ok(report, start));
    }

    let period = match kind {
        ReportKind::Weekly => weekly_period(now),
        ReportKind::Monthly => {
            let year = query.year.unwrap_or_else(|| now.year());
            let month = query.month.unwrap_or_else(|| now.month());
            format!("{year:04}-{month:02}")
        }
        ReportKind::Enforcement => enforcement_period(now),
    };

    let report = state
        .store
        .get_report(kind, &period)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no {period} report on record; pass generate=true")))?;
    Ok(ok(report, start))
}

/// `GET /api/reports/weekly/:id`.
pub async fn weekly_by_id(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let start = Instant::now();
    let period = id.strip_prefix("weekly-").unwrap_or(&id);
    let report = state
        .store
        .get_report(ReportKind::Weekly, period)
        .await?
        .filter(|r| r.id == id)
        .ok_or_else(|| ApiError::not_found(id))?;
    Ok(ok(report, start))
}

#[derive(Debug, Deserialize)]
pub struct EnforcementTargetsQuery {
    pub limit: Option<usize>,
    pub city: Option<String>,
}

/// `GET /api/reports/enforcement/targets?limit=&city=`: recomputes the
/// enforcement report and returns its ranked target list, optionally
/// filtered to one city (spec.md §4.3 "Enforcement").
pub async fn enforcement_targets(
    State(state): State<AppState>,
    Query(query): Query<EnforcementTargetsQuery>,
) -> ApiResult<Response> {
    let start = Instant::now();
    let report =
        ci_reports::generate_enforcement_report(state.store.as_ref(), &state.config.scoring, Utc::now()).await?;
    let mut targets = report
        .analytics
        .get("targets")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    if let Some(city) = &query.city {
        targets.retain(|t| t.get("city").and_then(|c| c.as_str()) == Some(city.as_str()));
    }
    if let Some(limit) = query.limit {
        targets.truncate(limit);
    }
    Ok(ok(json!({ "targets": targets }), start))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub limit: Option<usize>,
}

/// `GET /api/reports/history?type=&limit=`.
pub async fn history(State(state): State<AppState>, Query(query): Query<HistoryQuery>) -> ApiResult<Response> {
    let start = Instant::now();
    let kind = query.kind.as_deref().map(parse_kind).transpose()?;
    let limit = query.limit.unwrap_or(20);
    let reports = state.store.list_reports(kind, limit).await?;
    Ok(ok(reports, start))
}
