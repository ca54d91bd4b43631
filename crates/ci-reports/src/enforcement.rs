//! Enforcement report generator (spec.md §4.3 "Enforcement"): ranks
//! enforcement targets drawn from high/critical landlords, high-priority
//! listings and high-risk areas, then groups the ranked list by city to
//! estimate resourcing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ci_config::ScoringConfig;
use ci_query::ComplianceStore;
use ci_types::{
    EnforcementTargetType, Report, ReportKind, ReportMetric, RiskLevel, TptPaymentStatus,
};
use serde::Serialize;

use crate::error::ReportResult;

const PRIORITY_RISK_WEIGHT: f64 = 0.6;
const PRIORITY_REVENUE_WEIGHT: f64 = 0.4;
const REVENUE_NORMALIZATION: f64 = 50_000.0;
const TARGETS_PER_INSPECTOR: f64 = 10.0;
const HOURS_PER_TARGET: f64 = 2.0;
const OUTCOME_COLLECTION_RATE: f64 = 0.6;

fn is_high_risk(level: RiskLevel) -> bool {
    matches!(level, RiskLevel::High | RiskLevel::Critical)
}

fn target_priority(risk: f64, estimated_revenue: f64) -> f64 {
    let revenue_component = (estimated_revenue / REVENUE_NORMALIZATION * 100.0).min(100.0);
    PRIORITY_RISK_WEIGHT * risk + PRIORITY_REVENUE_WEIGHT * revenue_component
}

#[derive(Debug, Clone, Serialize)]
struct EnforcementTarget {
    target_id: String,
    target_type: EnforcementTargetType,
    city: String,
    risk: f64,
    estimated_revenue: f64,
    priority: f64,
}

#[derive(Debug, Clone, Serialize, Default)]
struct CityGroup {
    target_count: usize,
    inspectors_needed: u32,
    hours_needed: f64,
    estimated_outcome: f64,
}

async fn landlord_targets(store: &dyn ComplianceStore) -> ReportResult<Vec<EnforcementTarget>> {
    let mut targets = Vec::new();
    for score in store.list_landlord_risk_scores().await? {
        if !is_high_risk(score.risk_level) {
            continue;
        }
        let properties = store.list_properties_by_landlord(&score.target_id).await?;
        let city = properties
            .first()
            .map(|p| p.city.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let payments = store.list_payments_for_landlord(&score.target_id, 24).await?;
        let estimated_revenue: f64 = payments
            .iter()
            .filter(|p| {
                matches!(
                    p.status,
                    TptPaymentStatus::Pending | TptPaymentStatus::Overdue | TptPaymentStatus::Late
                )
            })
            .map(|p| p.amount)
            .sum();

        let risk = 100.0 - score.overall_score;
        targets.push(EnforcementTarget {
            target_id: score.target_id,
            target_type: EnforcementTargetType::Landlord,
            city,
            risk,
            estimated_revenue,
            priority: target_priority(risk, estimated_revenue),
        });
    }
    Ok(targets)
}

async fn listing_targets(store: &dyn ComplianceStore) -> ReportResult<Vec<EnforcementTarget>> {
    let mut targets = Vec::new();
    for score in store.list_listing_risk_scores().await? {
        if !is_high_risk(score.risk_level) {
            continue;
        }
        let city = store
            .get_listing(&score.target_id)
            .await?
            .map(|l| l.city)
            .unwrap_or_else(|| "unknown".to_string());
        let estimated_revenue = score.estimated_revenue.unwrap_or(0.0);
        let risk = 100.0 - score.overall_score;
        targets.push(EnforcementTarget {
            target_id: score.target_id,
            target_type: EnforcementTargetType::Listing,
            city,
            risk,
            estimated_revenue,
            priority: target_priority(risk, estimated_revenue),
        });
    }
    Ok(targets)
}

async fn area_targets(
    store: &dyn ComplianceStore,
    config: &ScoringConfig,
) -> ReportResult<Vec<EnforcementTarget>> {
    let mut targets = Vec::new();
    for city in store.list_cities().await? {
        let inputs = ci_scoring::engine::area_inputs_for_city(store, &city, None).await?;
        let assessment = ci_scoring::assess_area(&inputs, config);
        if !is_high_risk(assessment.risk_level) {
            continue;
        }
        let risk = assessment.overall_score;
        let estimated_revenue = inputs.estimated_revenue_at_risk;
        targets.push(EnforcementTarget {
            target_id: city.clone(),
            target_type: EnforcementTargetType::Area,
            city,
            risk,
            estimated_revenue,
            priority: target_priority(risk, estimated_revenue),
        });
    }
    Ok(targets)
}

/// Recomputes the enforcement report for the day `now` falls on, keyed
/// by generation date (spec.md §4.3, §5).
pub async fn generate_enforcement_report(
    store: &dyn ComplianceStore,
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> ReportResult<Report> {
    let period = now.format("%Y-%m-%d").to_string();

    let mut targets = landlord_targets(store).await?;
    targets.extend(listing_targets(store).await?);
    targets.extend(area_targets(store, config).await?);
    targets.sort_by(|a, b| b.priority.partial_cmp(&a.priority).unwrap());

    let mut groups: HashMap<String, CityGroup> = HashMap::new();
    for target in &targets {
        let group = groups.entry(target.city.clone()).or_default();
        group.target_count += 1;
        group.estimated_outcome += target.estimated_revenue * OUTCOME_COLLECTION_RATE;
    }
    for group in groups.values_mut() {
        group.inspectors_needed = (group.target_count as f64 / TARGETS_PER_INSPECTOR).ceil() as u32;
        group.hours_needed = group.target_count as f64 * HOURS_PER_TARGET;
    }

    let total_estimated_outcome: f64 = targets.iter().map(|t| t.estimated_revenue * OUTCOME_COLLECTION_RATE).sum();

    let mut recommendations = Vec::new();
    if let Some(top_city) = groups
        .iter()
        .max_by(|a, b| a.1.estimated_outcome.partial_cmp(&b.1.estimated_outcome).unwrap())
        .map(|(city, _)| city.clone())
    {
        recommendations.push(format!("Prioritise enforcement capacity in {top_city}"));
    }
    if targets.is_empty() {
        recommendations.push("No enforcement targets identified this cycle".to_string());
    } else {
        recommendations.push(format!(
            "Dispatch inspectors against the top {} ranked targets first",
            targets.len().min(10)
        ));
    }

    let metrics = vec![
        ReportMetric {
            name: "total_targets".to_string(),
            value: targets.len() as f64,
            unit: "count".to_string(),
            change: None,
            trend: None,
        },
        ReportMetric {
            name: "cities_covered".to_string(),
            value: groups.len() as f64,
            unit: "count".to_string(),
            change: None,
            trend: None,
        },
        ReportMetric {
            name: "estimated_outcome".to_string(),
            value: total_estimated_outcome,
            unit: "currency".to_string(),
            change: None,
            trend: None,
        },
    ];

    let analytics = serde_json::json!({
        "targets": targets,
        "city_groups": groups,
    });

    let report = Report {
        id: format!("enforcement-{period}"),
        kind: ReportKind::Enforcement,
        period,
        generated_at: now,
        headline: format!(
            "{} enforcement targets across {} cities; estimated outcome {:.0}",
            targets.len(),
            groups.len(),
            total_estimated_outcome
        ),
        metrics,
        highlights: Vec::new(),
        concerns: Vec::new(),
        analytics,
        alerts: Vec::new(),
        recommendations,
    };

    store.upsert_report(&report).await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ci_query::InMemoryStore;
    use ci_types::{RiskFactor, RiskScore};

    fn high_risk_landlord_score(id: &str, now: DateTime<Utc>) -> RiskScore {
        RiskScore {
            target_id: id.to_string(),
            overall_score: 25.0,
            risk_level: RiskLevel::Critical,
            factors: vec![RiskFactor {
                name: "payment_history".to_string(),
                weight: 1.0,
                score: 25.0,
                description: "test".to_string(),
            }],
            updated_at: now,
            recommendations: vec![],
            investigation_priority: None,
            estimated_revenue: None,
        }
    }

    #[tokio::test]
    async fn empty_store_reports_zero_targets() {
        let store = InMemoryStore::new();
        let config = ScoringConfig::default();
        let report = generate_enforcement_report(&store, &config, Utc::now()).await.unwrap();
        assert_eq!(report.id, format!("enforcement-{}", report.period));
        assert!(!report.recommendations.is_empty());
    }

    #[tokio::test]
    async fn critical_landlord_becomes_a_ranked_target() {
        let store = InMemoryStore::new();
        let config = ScoringConfig::default();
        let now = Utc::now();
        store.upsert_landlord_risk_score(&high_risk_landlord_score("landlord-1", now)).await.unwrap();

        let report = generate_enforcement_report(&store, &config, now).await.unwrap();
        let targets = report.analytics.get("targets").unwrap().as_array().unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0]["target_id"], "landlord-1");
    }
}
