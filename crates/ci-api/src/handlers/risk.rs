//! `/api/risk/*` handlers (spec.md §6): single-entity lookups, ranked
//! lists, and the two bulk-refresh endpoints that trigger the same
//! recomputation path the scheduler's `daily-risk-update` job uses.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use ci_query::ComplianceStore;
use ci_types::RiskLevel;
use serde::Deserialize;
use serde_json::json;

use crate::envelope::ok;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Bulk risk-update jobs are bounded to at most this many concurrent
/// scorings (spec.md §5); the manual-refresh endpoints reuse the same
/// constant as `ci-scheduler`'s daily job.
const MAX_CONCURRENCY: usize = 16;

fn parse_risk_level(raw: &str) -> Option<RiskLevel> {
    match raw.to_ascii_lowercase().as_str() {
        "low" => Some(RiskLevel::Low),
        "medium" => Some(RiskLevel::Medium),
        "high" => Some(RiskLevel::High),
        "critical" => Some(RiskLevel::Critical),
        _ => None,
    }
}

pub async fn landlord(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let start = Instant::now();
    let score = ci_scoring::engine::score_landlord_by_id(state.store.as_ref(), &id, &state.config.scoring).await?;
    Ok(ok(score, start))
}

#[derive(Debug, Deserialize)]
pub struct RiskListQuery {
    #[serde(rename = "riskLevel")]
    pub risk_level: Option<String>,
    pub limit: Option<usize>,
}

/// `GET /api/risk/landlords?riskLevel=&limit=`: reads the last-computed
/// scores from the store rather than recomputing on every request — the
/// score itself is only ever refreshed by the daily job or a manual
/// `/api/risk/refresh/landlords` call (spec.md §5 "no in-memory caches are
/// required; every request recomputes from source" applies to the scoring
/// math, not to re-running the whole-portfolio batch per list request).
pub async fn landlords_ranked(
    State(state): State<AppState>,
    Query(query): Query<RiskListQuery>,
) -> ApiResult<Response> {
    let start = Instant::now();
    let mut scores = state.store.list_landlord_risk_scores().await?;
    if let Some(raw) = &query.risk_level {
        let level = parse_risk_level(raw).ok_or_else(|| ApiError::validation("invalid riskLevel"))?;
        scores.retain(|s| s.risk_level == level);
    }
    scores.sort_by(|a, b| a.overall_score.partial_cmp(&b.overall_score).unwrap());
    if let Some(limit) = query.limit {
        scores.truncate(limit);
    }
    Ok(ok(scores, start))
}

pub async fn listing(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let start = Instant::now();
    let score = ci_scoring::engine::score_listing_by_id(state.store.as_ref(), &id, &state.config.scoring).await?;
    Ok(ok(score, start))
}

#[derive(Debug, Deserialize)]
pub struct PrioritizedQuery {
    pub limit: Option<usize>,
}

/// `GET /api/risk/listings/prioritized?limit=`: every listing, ranked by
/// `investigation_priority` descending (spec.md §4.1.2).
pub async fn listings_prioritized(
    State(state): State<AppState>,
    Query(query): Query<PrioritizedQuery>,
) -> ApiResult<Response> {
    let start = Instant::now();
    let mut scores = state.store.list_listing_risk_scores().await?;
    scores.sort_by(|a, b| {
        b.investigation_priority
            .unwrap_or(0.0)
            .partial_cmp(&a.investigation_priority.unwrap_or(0.0))
            .unwrap()
    });
    if let Some(limit) = query.limit {
        scores.truncate(limit);
    }
    Ok(ok(scores, start))
}

#[derive(Debug, Deserialize)]
pub struct AreaQuery {
    pub neighborhood: Option<String>,
}

pub async fn area(
    State(state): State<AppState>,
    Path(city): Path<String>,
    Query(query): Query<AreaQuery>,
) -> ApiResult<Response> {
    let start = Instant::now();
    let assessment = ci_scoring::engine::assess_area_by_city(
        state.store.as_ref(),
        &city,
        query.neighborhood.as_deref(),
        &state.config.scoring,
    )
    .await?;
    Ok(ok(assessment, start))
}

#[derive(Debug, Deserialize)]
pub struct AreasRankedQuery {
    pub limit: Option<usize>,
}

/// `GET /api/risk/areas/ranked?limit=`: assesses every city the store
/// knows about and ranks by `enforcement_priority` descending.
pub async fn areas_ranked(
    State(state): State<AppState>,
    Query(query): Query<AreasRankedQuery>,
) -> ApiResult<Response> {
    let start = Instant::now();
    let cities = state.store.list_cities().await?;
    let mut assessments = Vec::with_capacity(cities.len());
    for city in &cities {
        assessments.push(
            ci_scoring::engine::assess_area_by_city(state.store.as_ref(), city, None, &state.config.scoring).await?,
        );
    }
    assessments.sort_by(|a, b| b.enforcement_priority.partial_cmp(&a.enforcement_priority).unwrap());
    if let Some(limit) = query.limit {
        assessments.truncate(limit);
    }
    Ok(ok(assessments, start))
}

/// `POST /api/risk/refresh/landlords`: recomputes and upserts every
/// landlord's risk score with bounded concurrency (spec.md §5).
pub async fn refresh_landlords(State(state): State<AppState>) -> ApiResult<Response> {
    let start = Instant::now();
    let (scores, errors) =
        ci_scoring::engine::recompute_all_landlord_scores(state.store.clone(), state.scoring_config(), MAX_CONCURRENCY)
            .await;
    for score in &scores {
        state.store.upsert_landlord_risk_score(score).await?;
    }
    Ok(ok(
        json!({ "updated": scores.len(), "errors": errors.len(), "error_detail": errors }),
        start,
    ))
}

/// `POST /api/risk/refresh/listings`: recomputes and upserts every
/// listing's risk score, grouped by city (spec.md §5).
pub async fn refresh_listings(State(state): State<AppState>) -> ApiResult<Response> {
    let start = Instant::now();
    let (scores, errors) =
        ci_scoring::engine::recompute_all_listing_scores(state.store.clone(), state.scoring_config(), MAX_CONCURRENCY)
            .await;
    for score in &scores {
        state.store.upsert_listing_risk_score(score).await?;
    }
    Ok(ok(
        json!({ "updated": scores.len(), "errors": errors.len(), "error_detail": errors }),
        start,
    ))
}
