use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registration standing as tracked by the external property-management
/// system. The core only ever reads this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    FullyCompliant,
    PartiallyCompliant,
    Pending,
    NonCompliant,
}

/// Payment standing summary carried on the landlord record itself (distinct
/// from the per-payment `TptPaymentStatus` used in the payment history).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Current,
    Overdue,
    Delinquent,
}

/// One sample of how long a landlord took to respond to a compliance
/// inquiry. Up to 10 of these feed the response-time risk factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseTimeSample {
    pub sent_at: DateTime<Utc>,
    pub responded_at: DateTime<Utc>,
}

impl ResponseTimeSample {
    pub fn response_hours(&self) -> f64 {
        (self.responded_at - self.sent_at).num_minutes() as f64 / 60.0
    }
}

/// A landlord, read-only from the core's perspective.
///
/// Invariant: `property_count >= 0` (enforced by the type: `u32`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landlord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub property_count: u32,
    pub registration_status: RegistrationStatus,
    pub payment_status: PaymentStatus,
}
