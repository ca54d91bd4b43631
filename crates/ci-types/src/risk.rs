use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// One weighted input into an overall risk score.
///
/// Invariant (checked by scorers, not by this type): across all factors of
/// one `RiskScore`, `sum(weight) == 1.0 +/- 1e-3`; `score` is always in
/// `[0, 100]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub weight: f64,
    pub score: f64,
    pub description: String,
}

/// A derived, owned risk score for either a landlord or a listing. The two
/// cases share the same envelope; listing-only fields are `None` for
/// landlords and vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScore {
    pub target_id: String,
    pub overall_score: f64,
    pub risk_level: RiskLevel,
    pub factors: Vec<RiskFactor>,
    pub updated_at: DateTime<Utc>,
    pub recommendations: Vec<String>,
    /// Listing-only: 0-100 ranking combining inverted risk and revenue impact.
    pub investigation_priority: Option<f64>,
    /// Listing-only: estimated annual revenue used by the priority formula
    /// and by report generators.
    pub estimated_revenue: Option<f64>,
}

impl RiskScore {
    pub fn factor_weight_sum(&self) -> f64 {
        self.factors.iter().map(|f| f.weight).sum()
    }
}
