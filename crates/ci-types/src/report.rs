use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Weekly,
    Monthly,
    Enforcement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetric {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub change: Option<f64>,
    pub trend: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportAlert {
    pub severity: AlertSeverity,
    pub message: String,
}

/// An immutable report document, keyed by `(kind, period)`. Generation is
/// an upsert on that natural key (spec.md §4.3, §5): regenerating the same
/// period overwrites the previous document rather than appending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Natural key: `weekly-<iso-week-start>`, `monthly-YYYY-MM`, or
    /// `enforcement-<generation-date>`.
    pub id: String,
    pub kind: ReportKind,
    pub period: String,
    pub generated_at: DateTime<Utc>,
    pub headline: String,
    pub metrics: Vec<ReportMetric>,
    pub highlights: Vec<String>,
    pub concerns: Vec<String>,
    /// Detailed, component-specific analytics payload (hotspots, seasonal
    /// breakdowns, enforcement target lists, ...). Kept as a serialisable
    /// JSON value since its shape differs per report kind.
    pub analytics: serde_json::Value,
    pub alerts: Vec<ReportAlert>,
    pub recommendations: Vec<String>,
}
