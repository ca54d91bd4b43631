use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An owned notification row, enqueued by the weekly job when a report
/// carries a critical alert (spec.md §4.4). Delivery is out of scope; the
/// core only records that a notification was warranted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub source_report_id: String,
    pub severity: String,
    pub message: String,
}
