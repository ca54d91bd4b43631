//! Scraped-listing risk scorer (spec.md §4.1.2). Unlike the landlord
//! scorer, investigation priority inverts the weighted score: a high
//! priority means urgent enforcement attention, not a high risk score.

use chrono::{DateTime, Utc};
use ci_config::ScoringConfig;
use ci_types::{RiskFactor, RiskLevel, RiskScore, ScrapedListing};

use crate::level::{clamp_score, inverted_risk_level};

fn match_status_score(matched: bool) -> f64 {
    if matched {
        100.0
    } else {
        0.0
    }
}

fn activity_level_score(review_count: Option<u32>, days_active: i64) -> f64 {
    let months_active = (days_active as f64 / 30.0).max(1.0);
    let reviews_per_month = review_count.unwrap_or(0) as f64 / months_active;
    if reviews_per_month >= 10.0 {
        10.0
    } else if reviews_per_month >= 5.0 {
        30.0
    } else if reviews_per_month >= 2.0 {
        50.0
    } else if reviews_per_month >= 0.5 {
        70.0
    } else {
        90.0
    }
}

/// Estimated annual revenue, also used directly by the investigation
/// priority formula and by report generators (spec.md §4.1.2, §4.3).
pub fn estimated_annual_revenue(price_per_night: Option<f64>, review_count: Option<u32>) -> f64 {
    let price = price_per_night.unwrap_or(0.0);
    let capped_reviews = (review_count.unwrap_or(0) as f64 * 2.5).min(25.0);
    price * capped_reviews * 12.0
}

fn revenue_estimate_score(est_annual: f64) -> f64 {
    if est_annual >= 100_000.0 {
        5.0
    } else if est_annual >= 50_000.0 {
        20.0
    } else if est_annual >= 25_000.0 {
        40.0
    } else if est_annual >= 10_000.0 {
        65.0
    } else {
        85.0
    }
}

fn listing_age_score(days_active: i64) -> f64 {
    if days_active >= 365 {
        20.0
    } else if days_active >= 180 {
        35.0
    } else if days_active >= 90 {
        50.0
    } else if days_active >= 30 {
        70.0
    } else {
        85.0
    }
}

/// `host_listing_counts` is `(total_by_host, unregistered_of_those)`, as
/// returned by `ComplianceStore::count_listings_by_host`.
fn host_profile_score(has_host_id: bool, host_listing_counts: (u32, u32)) -> f64 {
    if !has_host_id {
        return 30.0;
    }
    let (total, unregistered) = host_listing_counts;
    if total >= 5 && unregistered >= 3 {
        10.0
    } else if total >= 3 {
        30.0
    } else if total > 1 {
        50.0
    } else {
        70.0
    }
}

fn location_risk_score(area_risk_level: RiskLevel) -> f64 {
    match area_risk_level {
        RiskLevel::Critical => 15.0,
        RiskLevel::High => 30.0,
        RiskLevel::Medium => 50.0,
        RiskLevel::Low => 70.0,
    }
}

fn recommendation_for(name: &str, score: f64) -> Option<String> {
    if score >= 50.0 {
        return None;
    }
    Some(match name {
        "match_status" => {
            "Unmatched listing; cross-reference against the property registry".to_string()
        }
        "activity_level" => "High review velocity suggests active short-term use".to_string(),
        "revenue_estimate" => {
            "Estimated tax-relevant revenue is substantial; prioritise for audit".to_string()
        }
        "listing_age" => "Recently listed; verify registration status promptly".to_string(),
        "host_profile" => "Host manages multiple unregistered listings".to_string(),
        "location_risk" => "Located in a high-risk area for unregistered rentals".to_string(),
        _ => format!("Investigate low {name} score"),
    })
}

/// Scores one scraped listing. `host_listing_counts` and `area_risk_level`
/// are looked up by the caller (the host-profile and location-risk factors
/// each depend on a cross-entity query, spec.md §4.1.2).
pub fn score_listing(
    listing: &ScrapedListing,
    host_listing_counts: (u32, u32),
    area_risk_level: RiskLevel,
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> RiskScore {
    let w = &config.listing_weights;
    let days_active = listing.days_active(now);
    let est_annual = estimated_annual_revenue(listing.price_per_night, listing.review_count);

    let factors = vec![
        RiskFactor {
            name: "match_status".to_string(),
            weight: w.match_status,
            score: match_status_score(listing.matched_registration),
            description: "Whether the listing matches a registered property".to_string(),
        },
        RiskFactor {
            name: "activity_level".to_string(),
            weight: w.activity_level,
            score: activity_level_score(listing.review_count, days_active),
            description: "Review velocity relative to time on market".to_string(),
        },
        RiskFactor {
            name: "revenue_estimate".to_string(),
            weight: w.revenue_estimate,
            score: revenue_estimate_score(est_annual),
            description: "Estimated annual revenue from price and review volume".to_string(),
        },
        RiskFactor {
            name: "listing_age".to_string(),
            weight: w.listing_age,
            score: listing_age_score(days_active),
            description: "Days since first observed".to_string(),
        },
        RiskFactor {
            name: "host_profile".to_string(),
            weight: w.host_profile,
            score: host_profile_score(listing.host_id.is_some(), host_listing_counts),
            description: "Other listings by the same host".to_string(),
        },
        RiskFactor {
            name: "location_risk".to_string(),
            weight: w.location_risk,
            score: location_risk_score(area_risk_level),
            description: "Risk level of the listing's city".to_string(),
        },
    ];

    let weighted_safety: f64 = factors.iter().map(|f| f.weight * f.score).sum();
    let risk = clamp_score(100.0 - weighted_safety);
    let revenue_component = (est_annual / 100_000.0 * 30.0).min(30.0);
    let investigation_priority = (0.7 * risk + revenue_component).round().min(100.0);
    let risk_level = inverted_risk_level(risk);

    let mut recommendations: Vec<String> = factors
        .iter()
        .filter_map(|f| recommendation_for(&f.name, f.score))
        .collect();
    if matches!(risk_level, RiskLevel::High | RiskLevel::Critical) {
        recommendations
            .push("Flag for the enforcement target list this cycle".to_string());
    }

    RiskScore {
        target_id: listing.id.clone(),
        overall_score: weighted_safety,
        risk_level,
        factors,
        updated_at: now,
        recommendations,
        investigation_priority: Some(investigation_priority),
        estimated_revenue: Some(est_annual),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn listing(now: DateTime<Utc>, matched: bool, price: f64, reviews: u32) -> ScrapedListing {
        ScrapedListing {
            id: "l1".to_string(),
            platform: "airbnb".to_string(),
            source_url: "https://example.com".to_string(),
            city: "Dakar".to_string(),
            neighborhood: None,
            latitude: 14.7,
            longitude: -17.4,
            price_per_night: Some(price),
            review_count: Some(reviews),
            rating: Some(4.5),
            host_id: Some("host-1".to_string()),
            host_name: Some("Host One".to_string()),
            first_scraped_at: now - Duration::days(200),
            last_scraped_at: now,
            matched_registration: matched,
            matched_landlord_id: None,
        }
    }

    #[test]
    fn investigation_priority_within_bounds_and_monotonic_in_revenue() {
        let now = Utc::now();
        let config = ci_config::ScoringConfig::default();
        let low_revenue = listing(now, false, 50.0, 10);
        let high_revenue = listing(now, false, 500.0, 200);

        let low = score_listing(&low_revenue, (1, 1), RiskLevel::Medium, &config, now);
        let high = score_listing(&high_revenue, (1, 1), RiskLevel::Medium, &config, now);

        assert!((0.0..=100.0).contains(&low.investigation_priority.unwrap()));
        assert!((0.0..=100.0).contains(&high.investigation_priority.unwrap()));
        assert!(high.investigation_priority.unwrap() >= low.investigation_priority.unwrap());
    }

    #[test]
    fn matched_listing_scores_safer_than_unmatched() {
        let now = Utc::now();
        let config = ci_config::ScoringConfig::default();
        let matched = score_listing(
            &listing(now, true, 50.0, 10),
            (1, 0),
            RiskLevel::Low,
            &config,
            now,
        );
        let unmatched = score_listing(
            &listing(now, false, 50.0, 10),
            (1, 0),
            RiskLevel::Low,
            &config,
            now,
        );
        assert!(matched.overall_score > unmatched.overall_score);
    }

    #[test]
    fn weights_sum_to_one() {
        let now = Utc::now();
        let config = ci_config::ScoringConfig::default();
        let score = score_listing(&listing(now, true, 50.0, 10), (1, 0), RiskLevel::Low, &config, now);
        assert!((score.factor_weight_sum() - 1.0).abs() < 1e-3);
    }
}
