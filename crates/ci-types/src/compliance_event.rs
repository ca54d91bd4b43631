use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceEventType {
    Violation,
    Warning,
    LateRegistration,
    ResolvedIssue,
    AuditPassed,
    OnTimePayment,
    LatePayment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceEvent {
    pub landlord_id: String,
    pub event_type: ComplianceEventType,
    pub event_date: DateTime<Utc>,
    pub description: String,
}
