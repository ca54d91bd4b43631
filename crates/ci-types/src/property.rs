use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyRegistrationStatus {
    Registered,
    Unregistered,
    Pending,
}

/// A property as recorded by the external registry. Read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub landlord_id: String,
    pub city: String,
    pub neighborhood: Option<String>,
    pub property_type: String,
    pub registration_status: PropertyRegistrationStatus,
    pub created_at: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
