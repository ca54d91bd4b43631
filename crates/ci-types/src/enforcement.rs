use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementTargetType {
    Landlord,
    Listing,
    Area,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementAction {
    pub target_id: String,
    pub target_type: EnforcementTargetType,
    pub city: String,
    pub action_type: String,
    pub status: String,
    pub outcome: Option<String>,
    pub created_at: DateTime<Utc>,
}
