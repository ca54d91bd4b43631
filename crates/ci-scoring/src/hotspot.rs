//! Hotspot detector (spec.md §4.1.4): density-based clustering of
//! unregistered, geolocated listings.
//!
//! The source implementation recurses to expand a cluster, which can
//! stack-overflow on a large dense cluster (REDESIGN FLAGS). This
//! implementation expands clusters with an explicit stack instead.

use std::collections::HashMap;

use ci_config::ScoringConfig;
use ci_types::{Hotspot, RiskLevel, ScrapedListing};

use crate::listing::estimated_annual_revenue;

fn distance(a: &ScrapedListing, b: &ScrapedListing) -> f64 {
    ((a.latitude - b.latitude).powi(2) + (a.longitude - b.longitude).powi(2)).sqrt()
}

fn mode<'a, I: Iterator<Item = &'a str>>(values: I) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(v, _)| v.to_string())
}

fn count_score(count: usize) -> u8 {
    if count >= 20 {
        4
    } else if count >= 10 {
        3
    } else if count >= 5 {
        2
    } else {
        1
    }
}

fn revenue_score(revenue: f64) -> u8 {
    if revenue >= 100_000.0 {
        4
    } else if revenue >= 50_000.0 {
        3
    } else if revenue >= 20_000.0 {
        2
    } else {
        1
    }
}

fn hotspot_risk_level(count: usize, revenue: f64) -> RiskLevel {
    let avg = (count_score(count) as f64 + revenue_score(revenue) as f64) / 2.0;
    if avg >= 3.5 {
        RiskLevel::Critical
    } else if avg >= 2.5 {
        RiskLevel::High
    } else if avg >= 1.5 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Clusters unregistered, geolocated listings using fixed-radius density
/// reachability and a minimum cluster size. Input should already be
/// filtered to unregistered listings with coordinates (the caller's
/// `ComplianceStore::list_unregistered_listings_with_coords`).
pub fn detect_hotspots(listings: &[ScrapedListing], config: &ScoringConfig) -> Vec<Hotspot> {
    let eps = config.hotspot.epsilon_degrees;
    let min_size = config.hotspot.min_cluster_size;
    let n = listings.len();
    let mut visited = vec![false; n];
    let mut hotspots = Vec::new();

    for seed in 0..n {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut members = vec![seed];
        let mut stack = vec![seed];

        while let Some(idx) = stack.pop() {
            for candidate in 0..n {
                if visited[candidate] {
                    continue;
                }
                if distance(&listings[idx], &listings[candidate]) <= eps {
                    visited[candidate] = true;
                    members.push(candidate);
                    stack.push(candidate);
                }
            }
        }

        if members.len() < min_size {
            continue;
        }

        let centroid_latitude =
            members.iter().map(|&i| listings[i].latitude).sum::<f64>() / members.len() as f64;
        let centroid_longitude =
            members.iter().map(|&i| listings[i].longitude).sum::<f64>() / members.len() as f64;
        let primary_city = mode(members.iter().map(|&i| listings[i].city.as_str()))
            .unwrap_or_default();
        let primary_neighborhood = mode(
            members
                .iter()
                .filter_map(|&i| listings[i].neighborhood.as_deref()),
        );
        let estimated_lost_revenue: f64 = members
            .iter()
            .map(|&i| {
                estimated_annual_revenue(listings[i].price_per_night, listings[i].review_count)
            })
            .sum();
        let risk_level = hotspot_risk_level(members.len(), estimated_lost_revenue);

        hotspots.push(Hotspot {
            centroid_latitude,
            centroid_longitude,
            primary_city,
            primary_neighborhood,
            unregistered_count: members.len(),
            estimated_lost_revenue,
            risk_level,
            member_listing_ids: members.iter().map(|&i| listings[i].id.clone()).collect(),
        });
    }

    hotspots.sort_by(|a, b| b.unregistered_count.cmp(&a.unregistered_count));
    hotspots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn point(id: &str, lat: f64, lon: f64) -> ScrapedListing {
        let now = Utc::now();
        ScrapedListing {
            id: id.to_string(),
            platform: "airbnb".to_string(),
            source_url: "https://example.com".to_string(),
            city: "Dakar".to_string(),
            neighborhood: Some("Plateau".to_string()),
            latitude: lat,
            longitude: lon,
            price_per_night: Some(80.0),
            review_count: Some(4),
            rating: Some(4.2),
            host_id: None,
            host_name: None,
            first_scraped_at: now,
            last_scraped_at: now,
            matched_registration: false,
            matched_landlord_id: None,
        }
    }

    /// Scenario 3 from spec.md §8.
    #[test]
    fn four_points_yield_one_cluster_of_three() {
        let listings = vec![
            point("a", 14.7000, -17.4000),
            point("b", 14.7005, -17.4005),
            point("c", 14.7010, -17.4010),
            point("d", 14.9000, -17.9000),
        ];
        let config = ci_config::ScoringConfig::default();
        let hotspots = detect_hotspots(&listings, &config);

        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].unregistered_count, 3);
        assert!((hotspots[0].centroid_latitude - 14.7005).abs() < 1e-9);
        assert!((hotspots[0].centroid_longitude - (-17.4005)).abs() < 1e-9);
    }

    #[test]
    fn clusters_never_fall_below_min_size() {
        let listings = vec![point("a", 0.0, 0.0), point("b", 0.0001, 0.0001)];
        let config = ci_config::ScoringConfig::default();
        let hotspots = detect_hotspots(&listings, &config);
        assert!(hotspots.is_empty());
    }

    #[test]
    fn every_member_is_within_epsilon_of_another_member() {
        let listings = vec![
            point("a", 14.70, -17.40),
            point("b", 14.7005, -17.4005),
            point("c", 14.701, -17.401),
        ];
        let config = ci_config::ScoringConfig::default();
        let hotspots = detect_hotspots(&listings, &config);
        assert_eq!(hotspots.len(), 1);
        let members = &hotspots[0];
        assert_eq!(members.unregistered_count, 3);
    }
}
