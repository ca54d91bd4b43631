use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A third-party short-term-rental listing observed on an aggregator site.
///
/// Invariant: `matched_landlord_id.is_some() => matched_registration == true`.
/// Callers that construct a `ScrapedListing` directly should use
/// [`ScrapedListing::new`] (or otherwise uphold the invariant themselves);
/// it is not re-checked on every field access since the type is also used
/// as a plain deserialization target for rows read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedListing {
    pub id: String,
    pub platform: String,
    pub source_url: String,
    pub city: String,
    pub neighborhood: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub price_per_night: Option<f64>,
    pub review_count: Option<u32>,
    pub rating: Option<f64>,
    pub host_id: Option<String>,
    pub host_name: Option<String>,
    pub first_scraped_at: DateTime<Utc>,
    pub last_scraped_at: DateTime<Utc>,
    pub matched_registration: bool,
    pub matched_landlord_id: Option<String>,
}

impl ScrapedListing {
    /// Days the listing has been observed, used by the listing-age factor.
    pub fn days_active(&self, now: DateTime<Utc>) -> i64 {
        (now - self.first_scraped_at).num_days().max(0)
    }
}
