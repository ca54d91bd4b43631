//! `/api/intelligence/*` handlers (spec.md §4.2, §6): the combined
//! enrich/verify endpoints, single-adapter convenience routes, batch
//! verification, and the INTERPOL entity-details proxy.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::response::Response;
use ci_enrichment::{EnrichmentRequest, VerificationRequest};
use serde::Deserialize;
use serde_json::json;

use crate::envelope::ok;
use crate::error::{ApiError, ApiResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// `POST /api/intelligence/enrich` (spec.md §8 scenario: 400 when
/// phone/email/name are all absent).
pub async fn enrich(State(state): State<AppState>, AppJson(request): AppJson<EnrichmentRequest>) -> ApiResult<Response> {
    let start = Instant::now();
    let response = state
        .enrichment
        .enrich(request)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;
    Ok(ok(response, start))
}

/// `POST /api/intelligence/verify` (spec.md §8: firstName/lastName empty
/// is a 400).
pub async fn verify(
    State(state): State<AppState>,
    AppJson(request): AppJson<VerificationRequest>,
) -> ApiResult<Response> {
    let start = Instant::now();
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(ApiError::validation("firstName and lastName are required"));
    }
    let response = state.enrichment.verify(request).await;
    Ok(ok(response, start))
}

#[derive(Debug, Deserialize)]
pub struct PhoneLookupBody {
    pub phone: String,
}

/// `POST /api/intelligence/phone-lookup`.
pub async fn phone_lookup(
    State(state): State<AppState>,
    AppJson(body): AppJson<PhoneLookupBody>,
) -> ApiResult<Response> {
    let start = Instant::now();
    if body.phone.trim().is_empty() {
        return Err(ApiError::validation("phone is required"));
    }
    let results = state
        .enrichment
        .phone_lookup(body.phone)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;
    Ok(ok(results, start))
}

#[derive(Debug, Deserialize)]
pub struct EmailLookupBody {
    pub email: String,
}

/// `POST /api/intelligence/email-lookup`.
pub async fn email_lookup(
    State(state): State<AppState>,
    AppJson(body): AppJson<EmailLookupBody>,
) -> ApiResult<Response> {
    let start = Instant::now();
    if body.email.trim().is_empty() {
        return Err(ApiError::validation("email is required"));
    }
    let results = state
        .enrichment
        .email_lookup(body.email)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;
    Ok(ok(results, start))
}

#[derive(Debug, Deserialize)]
pub struct NameLookupBody {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub nationality: Option<String>,
}

fn validate_name(body: &NameLookupBody) -> ApiResult<()> {
    if body.first_name.trim().is_empty() || body.last_name.trim().is_empty() {
        return Err(ApiError::validation("firstName and lastName are required"));
    }
    Ok(())
}

/// `POST /api/intelligence/sanctions-check`.
pub async fn sanctions_check(
    State(state): State<AppState>,
    AppJson(body): AppJson<NameLookupBody>,
) -> ApiResult<Response> {
    let start = Instant::now();
    validate_name(&body)?;
    let results = state
        .enrichment
        .sanctions_check(body.first_name, body.last_name, body.date_of_birth, body.nationality)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;
    Ok(ok(results, start))
}

/// `POST /api/intelligence/watchlist-check`.
pub async fn watchlist_check(
    State(state): State<AppState>,
    AppJson(body): AppJson<NameLookupBody>,
) -> ApiResult<Response> {
    let start = Instant::now();
    validate_name(&body)?;
    let results = state
        .enrichment
        .watchlist_check(body.first_name, body.last_name, body.date_of_birth, body.nationality)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;
    Ok(ok(results, start))
}

/// `POST /api/intelligence/pep-check`.
pub async fn pep_check(
    State(state): State<AppState>,
    AppJson(body): AppJson<NameLookupBody>,
) -> ApiResult<Response> {
    let start = Instant::now();
    validate_name(&body)?;
    let result = state
        .enrichment
        .pep_check(body.first_name, body.last_name, body.date_of_birth, body.nationality)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;
    Ok(ok(result, start))
}

/// `POST /api/intelligence/batch-verify` (spec.md §8 scenarios: >50
/// persons is a 400; exactly 50 succeeds).
pub async fn batch_verify(
    State(state): State<AppState>,
    AppJson(requests): AppJson<Vec<VerificationRequest>>,
) -> ApiResult<Response> {
    let start = Instant::now();
    if requests.len() > ci_enrichment::MAX_BATCH_VERIFY_SIZE {
        return Err(ApiError::validation(format!(
            "Maximum {} persons per batch request",
            ci_enrichment::MAX_BATCH_VERIFY_SIZE
        )));
    }
    let response = state
        .enrichment
        .batch_verify(requests)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;
    Ok(ok(response, start))
}

/// `GET /api/intelligence/interpol/:entityId`.
pub async fn interpol_entity(State(state): State<AppState>, Path(entity_id): Path<String>) -> ApiResult<Response> {
    let start = Instant::now();
    let outcome = state.enrichment.interpol_entity_details(&entity_id).await;
    Ok(ok(json!(outcome), start))
}
