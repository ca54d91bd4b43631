use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TptPaymentStatus {
    Completed,
    Pending,
    Overdue,
    Late,
}

/// A transient-occupancy-tax (TPT) payment record.
///
/// Invariant: `status == Completed => paid_date.is_some()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub landlord_id: String,
    pub city: String,
    pub amount: f64,
    pub status: TptPaymentStatus,
    pub due_date: DateTime<Utc>,
    pub payment_date: Option<DateTime<Utc>>,
    pub paid_date: Option<DateTime<Utc>>,
}

impl PaymentRecord {
    /// Days this payment is overdue, relative to `now`. Zero if not overdue.
    pub fn days_overdue(&self, now: DateTime<Utc>) -> i64 {
        if matches!(self.status, TptPaymentStatus::Overdue | TptPaymentStatus::Late) {
            (now - self.due_date).num_days().max(0)
        } else {
            0
        }
    }
}
