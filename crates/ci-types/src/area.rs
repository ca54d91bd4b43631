use serde::{Deserialize, Serialize};

use crate::risk::{RiskFactor, RiskLevel};

/// One historical compliance-rate data point, used for the six-month trend
/// line on an `AreaAssessment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaTrend {
    /// Calendar month, formatted `YYYY-MM`.
    pub month: String,
    pub compliance_rate: f64,
}

/// A derived, owned risk assessment for a city (optionally scoped to a
/// neighborhood within it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaAssessment {
    pub city: String,
    pub neighborhood: Option<String>,
    pub overall_score: f64,
    pub risk_level: RiskLevel,
    pub compliance_rate: f64,
    pub unregistered_estimate: u32,
    pub enforcement_priority: f64,
    pub factors: Vec<RiskFactor>,
    pub trends: Vec<AreaTrend>,
    pub recommendations: Vec<String>,
}
