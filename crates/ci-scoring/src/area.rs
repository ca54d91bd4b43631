//! City/neighborhood area assessor (spec.md §4.1.3).
//!
//! Unlike the landlord/listing scorers, the source spec does not give an
//! explicit per-factor scoring rule for area factors beyond "thresholds
//! drive the score" for growth trend — only weights and the top-level
//! formula are pinned down. The thresholds below follow the same
//! high-score-is-safe convention the other scorers use, so that
//! `overall = 100 - sum(weight*score)` reads consistently across the
//! whole scoring engine (documented as an Open Question resolution in
//! DESIGN.md).

use ci_config::ScoringConfig;
use ci_types::{AreaAssessment, AreaTrend, RiskFactor, RiskLevel};

use crate::level::clamp_score;

/// Pre-aggregated inputs for one city (optionally scoped to a
/// neighborhood). Callers are responsible for querying the store and
/// reducing raw rows down to these counts; this keeps the assessor itself
/// a pure function over plain numbers, matching the landlord/listing
/// scorers.
#[derive(Debug, Clone)]
pub struct AreaInputs {
    pub city: String,
    pub neighborhood: Option<String>,
    pub registered_count: u32,
    pub unregistered_count: u32,
    pub pending_count: u32,
    pub unregistered_count_three_months_ago: u32,
    pub estimated_revenue_at_risk: f64,
    pub enforcement_action_count: u32,
    pub unmatched_listing_count: u32,
    /// Up to six trailing monthly compliance-rate points, oldest first.
    pub trend_points: Vec<AreaTrend>,
}

impl AreaInputs {
    pub fn total_properties(&self) -> u32 {
        self.registered_count + self.unregistered_count + self.pending_count
    }

    pub fn compliance_rate(&self) -> f64 {
        let total = self.total_properties();
        if total == 0 {
            return 100.0;
        }
        self.registered_count as f64 / total as f64 * 100.0
    }
}

fn compliance_rate_score(compliance_rate: f64) -> f64 {
    clamp_score(compliance_rate)
}

fn unregistered_density_score(unregistered: u32, total: u32) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let density = unregistered as f64 / total as f64;
    clamp_score(100.0 - density * 100.0)
}

fn revenue_impact_score(estimated_revenue_at_risk: f64) -> f64 {
    if estimated_revenue_at_risk >= 500_000.0 {
        10.0
    } else if estimated_revenue_at_risk >= 250_000.0 {
        30.0
    } else if estimated_revenue_at_risk >= 100_000.0 {
        50.0
    } else if estimated_revenue_at_risk >= 50_000.0 {
        70.0
    } else {
        90.0
    }
}

fn enforcement_history_score(enforcement_action_count: u32) -> f64 {
    clamp_score(100.0 - enforcement_action_count as f64 * 10.0)
}

fn growth_trend_score(current: u32, three_months_ago: u32) -> f64 {
    let baseline = three_months_ago.max(1) as f64;
    let growth = (current as f64 - three_months_ago as f64) / baseline;
    if growth >= 0.50 {
        10.0
    } else if growth >= 0.25 {
        30.0
    } else if growth >= 0.10 {
        50.0
    } else if growth >= 0.0 {
        70.0
    } else {
        90.0
    }
}

fn area_risk_level(overall_score: f64) -> RiskLevel {
    if overall_score >= 80.0 {
        RiskLevel::Critical
    } else if overall_score >= 60.0 {
        RiskLevel::High
    } else if overall_score >= 40.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn recommendation_for(name: &str, score: f64) -> Option<String> {
    if score >= 50.0 {
        return None;
    }
    Some(match name {
        "compliance_rate" => "Compliance rate is low; launch a registration drive".to_string(),
        "unregistered_density" => {
            "High density of unregistered properties; prioritise sweeps".to_string()
        }
        "revenue_impact" => {
            "Substantial estimated tax revenue at risk in this area".to_string()
        }
        "enforcement_history" => {
            "Limited enforcement track record; escalate case volume".to_string()
        }
        "growth_trend" => {
            "Unregistered listings are growing; intervene before it compounds".to_string()
        }
        _ => format!("Investigate low {name} score"),
    })
}

pub fn assess_area(inputs: &AreaInputs, config: &ScoringConfig) -> AreaAssessment {
    let w = &config.area_weights;
    let compliance_rate = inputs.compliance_rate();
    let total = inputs.total_properties();

    let factors = vec![
        RiskFactor {
            name: "compliance_rate".to_string(),
            weight: w.compliance_rate,
            score: compliance_rate_score(compliance_rate),
            description: "Share of known properties registered".to_string(),
        },
        RiskFactor {
            name: "unregistered_density".to_string(),
            weight: w.unregistered_density,
            score: unregistered_density_score(inputs.unregistered_count, total),
            description: "Fraction of properties operating unregistered".to_string(),
        },
        RiskFactor {
            name: "revenue_impact".to_string(),
            weight: w.revenue_impact,
            score: revenue_impact_score(inputs.estimated_revenue_at_risk),
            description: "Estimated tax revenue exposed by unregistered activity".to_string(),
        },
        RiskFactor {
            name: "enforcement_history".to_string(),
            weight: w.enforcement_history,
            score: enforcement_history_score(inputs.enforcement_action_count),
            description: "Volume of prior enforcement action in the area".to_string(),
        },
        RiskFactor {
            name: "growth_trend".to_string(),
            weight: w.growth_trend,
            score: growth_trend_score(
                inputs.unregistered_count,
                inputs.unregistered_count_three_months_ago,
            ),
            description: "Change in unregistered count over the last three months".to_string(),
        },
    ];

    let weighted_safety: f64 = factors.iter().map(|f| f.weight * f.score).sum();
    let overall_score = clamp_score(100.0 - weighted_safety);
    let risk_level = area_risk_level(overall_score);
    let enforcement_priority =
        (overall_score + (inputs.unmatched_listing_count as f64 / 5.0).min(20.0)).min(100.0);

    let recommendations: Vec<String> = factors
        .iter()
        .filter_map(|f| recommendation_for(&f.name, f.score))
        .collect();

    AreaAssessment {
        city: inputs.city.clone(),
        neighborhood: inputs.neighborhood.clone(),
        overall_score,
        risk_level,
        compliance_rate,
        unregistered_estimate: inputs.unregistered_count,
        enforcement_priority,
        factors,
        trends: inputs.trend_points.clone(),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_inputs() -> AreaInputs {
        AreaInputs {
            city: "Dakar".to_string(),
            neighborhood: None,
            registered_count: 40,
            unregistered_count: 60,
            pending_count: 0,
            unregistered_count_three_months_ago: 40,
            estimated_revenue_at_risk: 600_000.0,
            enforcement_action_count: 1,
            unmatched_listing_count: 30,
            trend_points: vec![],
        }
    }

    #[test]
    fn weights_sum_to_one_and_bounds_hold() {
        let config = ci_config::ScoringConfig::default();
        let assessment = assess_area(&base_inputs(), &config);
        let sum: f64 = assessment.factors.iter().map(|f| f.weight).sum();
        assert!((sum - 1.0).abs() < 1e-3);
        assert!((0.0..=100.0).contains(&assessment.overall_score));
        assert!((0.0..=100.0).contains(&assessment.enforcement_priority));
    }

    #[test]
    fn high_unregistered_density_is_high_risk() {
        let config = ci_config::ScoringConfig::default();
        let assessment = assess_area(&base_inputs(), &config);
        assert_eq!(assessment.compliance_rate, 40.0);
        assert!(matches!(
            assessment.risk_level,
            RiskLevel::High | RiskLevel::Critical
        ));
    }

    #[test]
    fn empty_area_defaults_to_fully_compliant() {
        let config = ci_config::ScoringConfig::default();
        let inputs = AreaInputs {
            registered_count: 0,
            unregistered_count: 0,
            pending_count: 0,
            ..base_inputs()
        };
        let assessment = assess_area(&inputs, &config);
        assert_eq!(assessment.compliance_rate, 100.0);
    }
}
