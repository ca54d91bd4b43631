use serde::{Deserialize, Serialize};

/// One month of the revenue forecast (spec.md §4.1.5). `month_offset` is
/// 1-based (the first forecasted month is offset 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueForecastPoint {
    pub month_offset: u32,
    /// Calendar month the point predicts, formatted `YYYY-MM`.
    pub month: String,
    pub predicted: f64,
    pub confidence: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Aggregated stats for one calendar month across all years present in the
/// booking history (spec.md §4.1.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalMonthSummary {
    /// 1-12.
    pub month: u32,
    pub avg_occupancy: f64,
    pub avg_bookings: f64,
    pub revenue_index: f64,
    pub is_high_season: bool,
}

/// Full seasonal analysis result for a city or landlord's booking history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalAnalysis {
    pub months: Vec<SeasonalMonthSummary>,
    pub seasonality_index: f64,
    pub year_over_year_trend_pct: f64,
    pub peak_months: Vec<u32>,
}
