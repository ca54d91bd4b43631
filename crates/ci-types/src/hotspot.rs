use serde::{Deserialize, Serialize};

use crate::risk::RiskLevel;

/// One density-based cluster of unregistered listings (spec.md §4.1.4).
/// Hotspots are recomputed on demand from `ScrapedListing` rows rather
/// than persisted as their own table — they surface through the analytics
/// API and feed directly into monthly report analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotspot {
    pub centroid_latitude: f64,
    pub centroid_longitude: f64,
    pub primary_city: String,
    pub primary_neighborhood: Option<String>,
    pub unregistered_count: usize,
    pub estimated_lost_revenue: f64,
    pub risk_level: RiskLevel,
    pub member_listing_ids: Vec<String>,
}
