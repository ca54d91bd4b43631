//! Wires the pure scorers in this crate to the [`ComplianceStore`] query
//! layer. Each function here fetches exactly the inputs its scorer needs,
//! then delegates to the corresponding pure function so the arithmetic
//! itself stays independent of storage.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use ci_config::ScoringConfig;
use ci_query::ComplianceStore;
use ci_types::{AreaAssessment, AreaTrend, Hotspot, RevenueForecastPoint, RiskScore, SeasonalAnalysis};

use crate::area::{assess_area, AreaInputs};
use crate::error::{ScoringError, ScoringResult};
use crate::hotspot::detect_hotspots;
use crate::landlord::score_landlord;
use crate::listing::score_listing;
use crate::{forecast::forecast_revenue, seasonal::analyze_seasonality};

const RESPONSE_SAMPLE_LIMIT: usize = 10;
const PAYMENT_HISTORY_LIMIT: usize = 24;
const GROWTH_WINDOW_DAYS: i64 = 90;

pub async fn score_landlord_by_id(
    store: &dyn ComplianceStore,
    landlord_id: &str,
    config: &ScoringConfig,
) -> ScoringResult<RiskScore> {
    let landlord = store
        .get_landlord(landlord_id)
        .await?
        .ok_or_else(|| ScoringError::NotFound(landlord_id.to_string()))?;
    let payments = store
        .list_payments_for_landlord(landlord_id, PAYMENT_HISTORY_LIMIT)
        .await?;
    let events = store.list_compliance_events_for_landlord(landlord_id).await?;
    let samples = store
        .list_response_samples_for_landlord(landlord_id, RESPONSE_SAMPLE_LIMIT)
        .await?;
    score_landlord(&landlord, &payments, &events, &samples, config, Utc::now())
}

/// Builds an [`AreaInputs`] snapshot for a city from whatever the store
/// can answer today. The store's query surface is read-only snapshots
/// with no time-series endpoint, so the three-months-ago and six-month
/// trend figures are approximated from `created_at`/`first_scraped_at`
/// cutoffs rather than true historical state (documented in DESIGN.md).
pub async fn area_inputs_for_city(
    store: &dyn ComplianceStore,
    city: &str,
    neighborhood: Option<&str>,
) -> ScoringResult<AreaInputs> {
    let now = Utc::now();
    let properties = store.list_properties_by_city(city, neighborhood).await?;
    let listings = store.list_listings_by_city(city).await?;
    let enforcement_actions = store.list_enforcement_actions_for_city(city).await?;

    let registered_count = properties
        .iter()
        .filter(|p| matches!(p.registration_status, ci_types::PropertyRegistrationStatus::Registered))
        .count() as u32;
    let unregistered_count = properties
        .iter()
        .filter(|p| matches!(p.registration_status, ci_types::PropertyRegistrationStatus::Unregistered))
        .count() as u32;
    let pending_count = properties
        .iter()
        .filter(|p| matches!(p.registration_status, ci_types::PropertyRegistrationStatus::Pending))
        .count() as u32;

    let unmatched_listings: Vec<_> = listings.iter().filter(|l| !l.matched_registration).collect();
    let estimated_revenue_at_risk: f64 = unmatched_listings
        .iter()
        .map(|l| crate::listing::estimated_annual_revenue(l.price_per_night, l.review_count))
        .sum();

    let cutoff = now - Duration::days(GROWTH_WINDOW_DAYS);
    let unregistered_count_three_months_ago = unmatched_listings
        .iter()
        .filter(|l| l.first_scraped_at <= cutoff)
        .count() as u32;

    let mut trend_points = Vec::with_capacity(6);
    for months_back in (0..6).rev() {
        let point_cutoff = now - Duration::days(30 * months_back);
        let seen_by_then: Vec<_> = properties
            .iter()
            .filter(|p| p.created_at <= point_cutoff)
            .collect();
        let total = seen_by_then.len().max(1) as f64;
        let registered = seen_by_then
            .iter()
            .filter(|p| matches!(p.registration_status, ci_types::PropertyRegistrationStatus::Registered))
            .count() as f64;
        trend_points.push(AreaTrend {
            month: point_cutoff.format("%Y-%m").to_string(),
            compliance_rate: registered / total * 100.0,
        });
    }

    Ok(AreaInputs {
        city: city.to_string(),
        neighborhood: neighborhood.map(|s| s.to_string()),
        registered_count,
        unregistered_count,
        pending_count,
        unregistered_count_three_months_ago,
        estimated_revenue_at_risk,
        enforcement_action_count: enforcement_actions.len() as u32,
        unmatched_listing_count: unmatched_listings.len() as u32,
        trend_points,
    })
}

pub async fn assess_area_by_city(
    store: &dyn ComplianceStore,
    city: &str,
    neighborhood: Option<&str>,
    config: &ScoringConfig,
) -> ScoringResult<AreaAssessment> {
    let inputs = area_inputs_for_city(store, city, neighborhood).await?;
    Ok(assess_area(&inputs, config))
}

/// Scores a single listing, looking up its city's area risk level and its
/// host's other listings along the way.
pub async fn score_listing_by_id(
    store: &dyn ComplianceStore,
    listing_id: &str,
    config: &ScoringConfig,
) -> ScoringResult<RiskScore> {
    let listing = store
        .get_listing(listing_id)
        .await?
        .ok_or_else(|| ScoringError::NotFound(listing_id.to_string()))?;
    let host_counts = match &listing.host_id {
        Some(host_id) => store.count_listings_by_host(host_id).await?,
        None => (0, 0),
    };
    let area = assess_area_by_city(store, &listing.city, None, config).await?;
    Ok(score_listing(&listing, host_counts, area.risk_level, config, Utc::now()))
}

/// Scores every listing in a city, computing that city's area risk level
/// once up front instead of once per listing.
pub async fn score_listings_for_city(
    store: &dyn ComplianceStore,
    city: &str,
    config: &ScoringConfig,
) -> ScoringResult<Vec<RiskScore>> {
    let area = assess_area_by_city(store, city, None, config).await?;
    let listings = store.list_listings_by_city(city).await?;

    let mut host_cache: HashMap<String, (u32, u32)> = HashMap::new();
    let mut scores = Vec::with_capacity(listings.len());
    for listing in &listings {
        let host_counts = match &listing.host_id {
            Some(host_id) => {
                if let Some(counts) = host_cache.get(host_id) {
                    *counts
                } else {
                    let counts = store.count_listings_by_host(host_id).await?;
                    host_cache.insert(host_id.clone(), counts);
                    counts
                }
            }
            None => (0, 0),
        };
        scores.push(score_listing(listing, host_counts, area.risk_level, config, Utc::now()));
    }
    Ok(scores)
}

pub async fn detect_hotspots_all(
    store: &dyn ComplianceStore,
    config: &ScoringConfig,
) -> ScoringResult<Vec<Hotspot>> {
    let listings = store.list_unregistered_listings_with_coords().await?;
    Ok(detect_hotspots(&listings, config))
}

pub async fn forecast_city_revenue(
    store: &dyn ComplianceStore,
    city: &str,
    horizon_months: u32,
    config: &ScoringConfig,
) -> ScoringResult<Vec<RevenueForecastPoint>> {
    let payments = store.list_payments_for_city(city, None).await?;
    let mut monthly_totals: HashMap<(i32, u32), f64> = HashMap::new();
    for payment in payments
        .iter()
        .filter(|p| matches!(p.status, ci_types::TptPaymentStatus::Completed))
    {
        if let Some(paid_date) = payment.paid_date {
            use chrono::Datelike;
            *monthly_totals
                .entry((paid_date.year(), paid_date.month()))
                .or_insert(0.0) += payment.amount;
        }
    }
    let mut keys: Vec<_> = monthly_totals.keys().cloned().collect();
    keys.sort();
    let history: Vec<f64> = keys.iter().map(|k| monthly_totals[k]).collect();
    let as_of = chrono::Utc::now().date_naive();
    Ok(forecast_revenue(&history, horizon_months, as_of, config))
}

pub async fn seasonal_analysis_for_city(
    store: &dyn ComplianceStore,
    city: &str,
    config: &ScoringConfig,
) -> ScoringResult<SeasonalAnalysis> {
    let bookings = store.list_bookings_for_city(city).await?;
    let as_of = chrono::Utc::now().date_naive();
    Ok(analyze_seasonality(&bookings, as_of, config))
}

/// Bulk-recomputes every landlord's risk score with bounded concurrency
/// (spec.md §5: "bulk risk-update jobs must bound their concurrency...
/// e.g. <=16 in-flight scorings"). Partial failures are tolerated: one
/// landlord's error is collected rather than aborting the batch.
pub async fn recompute_all_landlord_scores(
    store: Arc<dyn ComplianceStore>,
    config: Arc<ScoringConfig>,
    max_concurrency: usize,
) -> (Vec<RiskScore>, Vec<(String, String)>) {
    use futures::stream::{self, StreamExt};

    let landlords = match store.list_landlords().await {
        Ok(l) => l,
        Err(e) => return (Vec::new(), vec![("*".to_string(), e.to_string())]),
    };

    let results: Vec<(String, Result<RiskScore, String>)> = stream::iter(landlords)
        .map(|landlord| {
            let store = store.clone();
            let config = config.clone();
            async move {
                let id = landlord.id.clone();
                let outcome = score_landlord_by_id(store.as_ref(), &id, &config)
                    .await
                    .map_err(|e| e.to_string());
                (id, outcome)
            }
        })
        .buffer_unordered(max_concurrency)
        .collect()
        .await;

    let mut scores = Vec::new();
    let mut errors = Vec::new();
    for (id, outcome) in results {
        match outcome {
            Ok(score) => scores.push(score),
            Err(message) => errors.push((id, message)),
        }
    }
    (scores, errors)
}

/// Bulk-recomputes every listing's risk score, grouped by city so the
/// area assessment for each city is computed once (spec.md §5 bounded
/// concurrency applies per-city, not per-listing, since area lookups
/// dominate the per-listing cost).
pub async fn recompute_all_listing_scores(
    store: Arc<dyn ComplianceStore>,
    config: Arc<ScoringConfig>,
    max_concurrency: usize,
) -> (Vec<RiskScore>, Vec<(String, String)>) {
    use futures::stream::{self, StreamExt};

    let cities = match store.list_cities().await {
        Ok(c) => c,
        Err(e) => return (Vec::new(), vec![("*".to_string(), e.to_string())]),
    };

    let results: Vec<(String, Result<Vec<RiskScore>, String>)> = stream::iter(cities)
        .map(|city| {
            let store = store.clone();
            let config = config.clone();
            async move {
                let outcome = score_listings_for_city(store.as_ref(), &city, &config)
                    .await
                    .map_err(|e| e.to_string());
                (city, outcome)
            }
        })
        .buffer_unordered(max_concurrency)
        .collect()
        .await;

    let mut scores = Vec::new();
    let mut errors = Vec::new();
    for (city, outcome) in results {
        match outcome {
            Ok(city_scores) => scores.extend(city_scores),
            Err(message) => errors.push((city, message)),
        }
    }
    (scores, errors)
}
