//! `/api/analytics/*` handlers (spec.md §6): compliance velocity,
//! revenue totals/forecasts, hotspots, seasonality and demand prediction.
//! These routes compose `ci-scoring`'s pure analytics functions over a
//! store-wide view rather than a single city, so most of the aggregation
//! across cities happens here rather than in the engine module.

use std::collections::HashMap;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::response::Response;
use chrono::{Datelike, NaiveDate, Utc};
use ci_types::PropertyRegistrationStatus;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::envelope::ok;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ComplianceQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    30
}

/// `GET /api/analytics/compliance?days=N`: current compliance rate, the
/// velocity of change over the requested window, and a naive linear
/// 30-day-ahead projection of that velocity.
pub async fn compliance(
    State(state): State<AppState>,
    Query(query): Query<ComplianceQuery>,
) -> ApiResult<Response> {
    let start = Instant::now();
    let properties = state.store.list_all_properties().await?;
    let total = properties.len() as f64;
    let registered = properties
        .iter()
        .filter(|p| matches!(p.registration_status, PropertyRegistrationStatus::Registered))
        .count() as f64;
    let current_rate = if total > 0.0 { registered / total * 100.0 } else { 100.0 };

    let cutoff = Utc::now() - chrono::Duration::days(query.days);
    let seen_by_cutoff = properties.iter().filter(|p| p.created_at <= cutoff).count() as f64;
    let registered_by_cutoff = properties
        .iter()
        .filter(|p| {
            p.created_at <= cutoff
                && matches!(p.registration_status, PropertyRegistrationStatus::Registered)
        })
        .count() as f64;
    let past_rate = if seen_by_cutoff > 0.0 {
        registered_by_cutoff / seen_by_cutoff * 100.0
    } else {
        current_rate
    };

    let velocity_per_day = if query.days > 0 {
        (current_rate - past_rate) / query.days as f64
    } else {
        0.0
    };
    let prediction_30d = (current_rate + velocity_per_day * 30.0).clamp(0.0, 100.0);

    Ok(ok(
        json!({
            "current_compliance_rate": current_rate,
            "window_days": query.days,
            "velocity_per_day": velocity_per_day,
            "prediction_30_day": prediction_30d,
            "total_properties": total as u64,
            "registered_properties": registered as u64,
        }),
        start,
    ))
}

/// `GET /api/analytics/revenue`: total completed TPT revenue across every
/// city the store knows about, with no forecast horizon.
pub async fn revenue(State(state): State<AppState>) -> ApiResult<Response> {
    let start = Instant::now();
    let cities = state.store.list_cities().await?;
    let mut total = 0.0_f64;
    let mut by_city = HashMap::new();
    for city in &cities {
        let payments = state.store.list_payments_for_city(city, None).await?;
        let city_total: f64 = payments
            .iter()
            .filter(|p| matches!(p.status, ci_types::TptPaymentStatus::Completed))
            .map(|p| p.amount)
            .sum();
        total += city_total;
        by_city.insert(city.clone(), city_total);
    }
    Ok(ok(json!({ "total_revenue": total, "by_city": by_city }), start))
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    #[serde(default = "default_months")]
    pub months: u32,
}

fn default_months() -> u32 {
    3
}

/// `GET /api/analytics/revenue/forecast?months=N`: forecasts store-wide
/// revenue by summing each city's monthly completed-payment history before
/// handing the combined series to the forecaster (spec.md §4.1.5).
pub async fn revenue_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<Response> {
    let start = Instant::now();
    let cities = state.store.list_cities().await?;
    let mut monthly_totals: HashMap<(i32, u32), f64> = HashMap::new();
    for city in &cities {
        let payments = state.store.list_payments_for_city(city, None).await?;
        for payment in payments
            .iter()
            .filter(|p| matches!(p.status, ci_types::TptPaymentStatus::Completed))
        {
            if let Some(paid_date) = payment.paid_date {
                *monthly_totals.entry((paid_date.year(), paid_date.month())).or_insert(0.0) +=
                    payment.amount;
            }
        }
    }
    let mut keys: Vec<_> = monthly_totals.keys().copied().collect();
    keys.sort();
    let history: Vec<f64> = keys.iter().map(|k| monthly_totals[k]).collect();
    let as_of = Utc::now().date_naive();
    let forecast = ci_scoring::forecast_revenue(&history, query.months, as_of, &state.config.scoring);
    Ok(ok(forecast, start))
}

#[derive(Debug, Deserialize)]
pub struct HotspotsQuery {
    pub city: Option<String>,
    pub limit: Option<usize>,
}

/// `GET /api/analytics/hotspots[?city=&limit=]`.
pub async fn hotspots(
    State(state): State<AppState>,
    Query(query): Query<HotspotsQuery>,
) -> ApiResult<Response> {
    let start = Instant::now();
    let mut hotspots = ci_scoring::engine::detect_hotspots_all(state.store.as_ref(), &state.config.scoring).await?;
    if let Some(city) = &query.city {
        hotspots.retain(|h| &h.primary_city == city);
    }
    if let Some(limit) = query.limit {
        hotspots.truncate(limit);
    }
    Ok(ok(hotspots, start))
}

#[derive(Debug, Deserialize)]
pub struct BoundsQuery {
    #[serde(rename = "minLat")]
    pub min_lat: Option<f64>,
    #[serde(rename = "maxLat")]
    pub max_lat: Option<f64>,
    #[serde(rename = "minLon")]
    pub min_lon: Option<f64>,
    #[serde(rename = "maxLon")]
    pub max_lon: Option<f64>,
}

/// `GET /api/analytics/hotspots/bounds?minLat=&maxLat=&minLon=&maxLon=`:
/// clusters only the unregistered listings whose coordinates fall inside
/// the requested bounding box (spec.md §8 scenario 5: all four bounds are
/// required, or the request is rejected).
pub async fn hotspots_bounds(
    State(state): State<AppState>,
    Query(query): Query<BoundsQuery>,
) -> ApiResult<Response> {
    let start = Instant::now();
    let (min_lat, max_lat, min_lon, max_lon) =
        match (query.min_lat, query.max_lat, query.min_lon, query.max_lon) {
            (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
            _ => {
                return Err(ApiError::validation(
                    "Missing required bounds parameters: minLat, maxLat, minLon, maxLon",
                ))
            }
        };

    let listings: Vec<_> = state
        .store
        .list_unregistered_listings_with_coords()
        .await?
        .into_iter()
        .filter(|l| {
            l.latitude >= min_lat && l.latitude <= max_lat && l.longitude >= min_lon && l.longitude <= max_lon
        })
        .collect();
    let hotspots = ci_scoring::detect_hotspots(&listings, &state.config.scoring);
    Ok(ok(hotspots, start))
}

#[derive(Debug, Deserialize)]
pub struct SeasonalQuery {
    #[serde(default = "default_years")]
    pub years: i64,
}

fn default_years() -> i64 {
    2
}

/// `GET /api/analytics/seasonal?years=N`: aggregates bookings from every
/// city within the requested lookback window before running the seasonal
/// analyser (spec.md §4.1.6).
pub async fn seasonal(
    State(state): State<AppState>,
    Query(query): Query<SeasonalQuery>,
) -> ApiResult<Response> {
    let start = Instant::now();
    let cities = state.store.list_cities().await?;
    let cutoff = Utc::now().date_naive() - chrono::Duration::days(query.years.max(0) * 365);
    let mut bookings = Vec::new();
    for city in &cities {
        let city_bookings = state.store.list_bookings_for_city(city).await?;
        bookings.extend(city_bookings.into_iter().filter(|b| b.check_in_date >= cutoff));
    }
    let as_of = Utc::now().date_naive();
    let analysis = ci_scoring::analyze_seasonality(&bookings, as_of, &state.config.scoring);
    Ok(ok(analysis, start))
}

#[derive(Debug, Deserialize)]
pub struct DemandQuery {
    pub date: String,
}

/// `GET /api/analytics/demand/predict?date=YYYY-MM-DD`: reads the
/// requested date's calendar month off the same seasonal breakdown
/// `seasonal` returns, so the two endpoints never disagree.
pub async fn demand_predict(
    State(state): State<AppState>,
    Query(query): Query<DemandQuery>,
) -> ApiResult<Response> {
    let start = Instant::now();
    let target_date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| ApiError::validation("date must be formatted YYYY-MM-DD"))?;

    let cities = state.store.list_cities().await?;
    let mut bookings = Vec::new();
    for city in &cities {
        bookings.extend(state.store.list_bookings_for_city(city).await?);
    }
    let as_of = Utc::now().date_naive();
    let analysis = ci_scoring::analyze_seasonality(&bookings, as_of, &state.config.scoring);
    let month_summary = analysis.months.iter().find(|m| m.month == target_date.month());

    Ok(ok(
        json!({
            "date": query.date,
            "month": target_date.month(),
            "month_summary": month_summary,
            "is_high_season": month_summary.map(|m| m.is_high_season).unwrap_or(false),
        }),
        start,
    ))
}
