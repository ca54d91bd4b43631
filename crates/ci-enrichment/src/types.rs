//! Request/response shapes for the enrichment orchestrator (spec.md §4.2,
//! §6). These are the orchestrator's own wire-adjacent types; `ci-api`
//! maps them directly onto JSON request/response bodies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Uniform per-adapter outcome (spec.md §4.2 "Adapter inventory"): every
/// adapter, successful or not, reports through this shape so the
/// orchestrator never special-cases a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterOutcome {
    pub success: bool,
    pub source_name: String,
    pub checked_at: DateTime<Utc>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AdapterOutcome {
    pub fn ok(source_name: &str, duration: Duration, data: serde_json::Value) -> Self {
        Self {
            success: true,
            source_name: source_name.to_string(),
            checked_at: Utc::now(),
            duration_ms: duration.as_millis() as u64,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(source_name: &str, duration: Duration, error: impl Into<String>) -> Self {
        Self {
            success: false,
            source_name: source_name.to_string(),
            checked_at: Utc::now(),
            duration_ms: duration.as_millis() as u64,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn not_configured(source_name: &str) -> Self {
        Self::failed(source_name, Duration::from_millis(0), "not configured")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichmentOptions {
    pub phone: Option<bool>,
    pub email: Option<bool>,
    pub sanctions: Option<bool>,
    pub watchlist: Option<bool>,
}

impl EnrichmentOptions {
    pub fn enabled(&self, category: EnrichmentCategory, default_if_input_present: bool) -> bool {
        let flag = match category {
            EnrichmentCategory::Phone => self.phone,
            EnrichmentCategory::Email => self.email,
            EnrichmentCategory::Sanctions => self.sanctions,
            EnrichmentCategory::Watchlist => self.watchlist,
        };
        flag.unwrap_or(default_if_input_present)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum EnrichmentCategory {
    Phone,
    Email,
    Sanctions,
    Watchlist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentRequest {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    #[serde(default)]
    pub options: EnrichmentOptions,
}

/// A value discovered from one or more providers, deduped by natural key
/// and tagged with the provider(s) that reported it (spec.md §4.2
/// "Normalisation").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedValue {
    pub value: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedIdentity {
    pub names: Vec<String>,
    pub emails: Vec<TaggedValue>,
    pub phones: Vec<TaggedValue>,
    pub photos: Vec<TaggedValue>,
    pub locations: Vec<TaggedValue>,
    pub social_profiles: Vec<TaggedValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Clear,
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u32,
    pub level: RiskLevel,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderError {
    pub source: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentResponse {
    pub identity: NormalizedIdentity,
    pub risk: RiskAssessment,
    pub provider_results: Vec<AdapterOutcome>,
    pub errors: Vec<ProviderError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationOptions {
    pub sanctions: Option<bool>,
    pub interpol: Option<bool>,
    pub fbi: Option<bool>,
    pub europol: Option<bool>,
}

impl VerificationOptions {
    fn flag(value: Option<bool>) -> bool {
        value.unwrap_or(true)
    }

    pub fn run_sanctions(&self) -> bool {
        Self::flag(self.sanctions)
    }
    pub fn run_interpol(&self) -> bool {
        Self::flag(self.interpol)
    }
    pub fn run_fbi(&self) -> bool {
        Self::flag(self.fbi)
    }
    pub fn run_europol(&self) -> bool {
        Self::flag(self.europol)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationRequest {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    #[serde(default)]
    pub options: VerificationOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Clear,
    Review,
    Flagged,
    Blocked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub status: VerificationStatus,
    pub risk: RiskAssessment,
    pub sanctions_checked: bool,
    pub sanctions_matches: Vec<serde_json::Value>,
    pub watchlist_matches: Vec<serde_json::Value>,
    pub recommendations: Vec<String>,
    pub provider_results: Vec<AdapterOutcome>,
    pub errors: Vec<ProviderError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchVerificationItem {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub response: VerificationResponse,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchVerificationSummary {
    pub clear: usize,
    pub review: usize,
    pub flagged: usize,
    pub blocked: usize,
}

impl BatchVerificationSummary {
    pub fn record(&mut self, status: &VerificationStatus) {
        match status {
            VerificationStatus::Clear => self.clear += 1,
            VerificationStatus::Review => self.review += 1,
            VerificationStatus::Flagged => self.flagged += 1,
            VerificationStatus::Blocked => self.blocked += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.clear + self.review + self.flagged + self.blocked
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchVerificationResponse {
    pub results: Vec<BatchVerificationItem>,
    pub summary: BatchVerificationSummary,
}
