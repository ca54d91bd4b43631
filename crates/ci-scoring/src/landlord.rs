//! Landlord risk scorer (spec.md §4.1.1): six weighted factors computed
//! from a landlord's record, last <=24 payments, all compliance events and
//! up to 10 response-time samples.

use chrono::{DateTime, Utc};
use ci_config::ScoringConfig;
use ci_types::{
    ComplianceEvent, ComplianceEventType, Landlord, PaymentRecord, RegistrationStatus,
    ResponseTimeSample, RiskFactor, RiskLevel, RiskScore, TptPaymentStatus,
};

use crate::error::ScoringResult;
use crate::level::{landlord_listing_risk_level, clamp_score};

const MAX_PAYMENTS: usize = 24;
const MAX_RESPONSE_SAMPLES: usize = 10;

fn payment_history_score(payments: &[PaymentRecord], now: DateTime<Utc>) -> f64 {
    if payments.is_empty() {
        return 50.0;
    }
    let mut score = 100.0;
    for payment in payments.iter().take(MAX_PAYMENTS) {
        match payment.status {
            TptPaymentStatus::Overdue => {
                let days = payment.days_overdue(now);
                score -= if days > 90 {
                    20.0
                } else if days > 60 {
                    15.0
                } else if days > 30 {
                    10.0
                } else {
                    5.0
                };
            }
            TptPaymentStatus::Late => score -= 3.0,
            TptPaymentStatus::Completed | TptPaymentStatus::Pending => {}
        }
    }
    clamp_score(score)
}

fn registration_compliance_score(status: RegistrationStatus) -> f64 {
    match status {
        RegistrationStatus::FullyCompliant => 100.0,
        RegistrationStatus::PartiallyCompliant => 60.0,
        RegistrationStatus::Pending => 40.0,
        RegistrationStatus::NonCompliant => 10.0,
    }
}

fn portfolio_size_score(property_count: u32) -> f64 {
    match property_count {
        0 => 100.0,
        1..=4 => 85.0,
        5..=9 => 70.0,
        10..=19 => 55.0,
        _ => 40.0,
    }
}

fn account_age_score(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days = (now - created_at).num_days();
    if days >= 730 {
        90.0
    } else if days >= 365 {
        80.0
    } else if days >= 180 {
        65.0
    } else if days >= 90 {
        50.0
    } else {
        35.0
    }
}

fn compliance_history_score(events: &[ComplianceEvent]) -> f64 {
    if events.is_empty() {
        return 70.0;
    }
    let mut score = 100.0;
    for event in events {
        score += match event.event_type {
            ComplianceEventType::Violation => -15.0,
            ComplianceEventType::Warning => -8.0,
            ComplianceEventType::LateRegistration => -5.0,
            ComplianceEventType::ResolvedIssue => 3.0,
            ComplianceEventType::AuditPassed => 5.0,
            ComplianceEventType::OnTimePayment | ComplianceEventType::LatePayment => 0.0,
        };
    }
    clamp_score(score)
}

fn response_time_score(samples: &[ResponseTimeSample]) -> f64 {
    if samples.is_empty() {
        return 70.0;
    }
    let considered = &samples[..samples.len().min(MAX_RESPONSE_SAMPLES)];
    let mean_hours: f64 =
        considered.iter().map(ResponseTimeSample::response_hours).sum::<f64>() / considered.len() as f64;
    if mean_hours <= 24.0 {
        95.0
    } else if mean_hours <= 48.0 {
        85.0
    } else if mean_hours <= 72.0 {
        70.0
    } else if mean_hours <= 168.0 {
        50.0
    } else {
        30.0
    }
}

fn recommendation_for(name: &str, score: f64) -> Option<String> {
    if score >= 50.0 {
        return None;
    }
    Some(match name {
        "payment_history" => {
            "Engage landlord on overdue/late tax payments before escalating to enforcement"
                .to_string()
        }
        "registration_compliance" => {
            "Follow up on incomplete property registration paperwork".to_string()
        }
        "portfolio_size" => {
            "Review the large portfolio for unregistered properties".to_string()
        }
        "account_age" => "New account; monitor closely during onboarding period".to_string(),
        "compliance_history" => {
            "Recent violations/warnings warrant a compliance check-in".to_string()
        }
        "response_time" => {
            "Slow responses to inquiries; consider a direct outreach call".to_string()
        }
        _ => format!("Investigate low {name} score"),
    })
}

/// Scores one landlord given its record plus the query-layer inputs named
/// in spec.md §4.1.1. Pure function of its arguments; callers own fetching
/// the inputs from the store.
pub fn score_landlord(
    landlord: &Landlord,
    payments: &[PaymentRecord],
    events: &[ComplianceEvent],
    response_samples: &[ResponseTimeSample],
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> ScoringResult<RiskScore> {
    let w = &config.landlord_weights;

    let factors = vec![
        RiskFactor {
            name: "payment_history".to_string(),
            weight: w.payment_history,
            score: payment_history_score(payments, now),
            description: "Payment history across the last 24 tax payments".to_string(),
        },
        RiskFactor {
            name: "registration_compliance".to_string(),
            weight: w.registration_compliance,
            score: registration_compliance_score(landlord.registration_status),
            description: "Current property registration status".to_string(),
        },
        RiskFactor {
            name: "portfolio_size".to_string(),
            weight: w.portfolio_size,
            score: portfolio_size_score(landlord.property_count),
            description: "Number of properties under management".to_string(),
        },
        RiskFactor {
            name: "account_age".to_string(),
            weight: w.account_age,
            score: account_age_score(landlord.created_at, now),
            description: "Tenure on the platform".to_string(),
        },
        RiskFactor {
            name: "compliance_history".to_string(),
            weight: w.compliance_history,
            score: compliance_history_score(events),
            description: "Violations, warnings and resolutions on record".to_string(),
        },
        RiskFactor {
            name: "response_time".to_string(),
            weight: w.response_time,
            score: response_time_score(response_samples),
            description: "Average time to respond to compliance inquiries".to_string(),
        },
    ];

    let overall_score: f64 = factors.iter().map(|f| f.weight * f.score).sum();
    let risk_level = landlord_listing_risk_level(overall_score);

    let mut recommendations: Vec<String> = factors
        .iter()
        .filter_map(|f| recommendation_for(&f.name, f.score))
        .collect();

    if matches!(risk_level, RiskLevel::High | RiskLevel::Critical) {
        recommendations.push(
            "Prioritise this landlord for the next enforcement review cycle".to_string(),
        );
    }

    Ok(RiskScore {
        target_id: landlord.id.clone(),
        overall_score,
        risk_level,
        factors,
        updated_at: now,
        recommendations,
        investigation_priority: None,
        estimated_revenue: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ci_types::PaymentStatus;

    fn base_landlord(now: DateTime<Utc>) -> Landlord {
        Landlord {
            id: "landlord-1".to_string(),
            name: "Jean Dupont".to_string(),
            email: "jean@example.com".to_string(),
            created_at: now - chrono::Duration::days(30),
            property_count: 3,
            registration_status: RegistrationStatus::NonCompliant,
            payment_status: PaymentStatus::Overdue,
        }
    }

    fn overdue_payment(now: DateTime<Utc>, days_overdue: i64) -> PaymentRecord {
        PaymentRecord {
            id: "p".to_string(),
            landlord_id: "landlord-1".to_string(),
            city: "Dakar".to_string(),
            amount: 100.0,
            status: TptPaymentStatus::Overdue,
            due_date: now - chrono::Duration::days(days_overdue),
            payment_date: None,
            paid_date: None,
        }
    }

    fn late_payment(now: DateTime<Utc>) -> PaymentRecord {
        PaymentRecord {
            id: "p2".to_string(),
            landlord_id: "landlord-1".to_string(),
            city: "Dakar".to_string(),
            amount: 100.0,
            status: TptPaymentStatus::Late,
            due_date: now - chrono::Duration::days(5),
            payment_date: Some(now),
            paid_date: Some(now),
        }
    }

    /// Scenario 2 from spec.md §8: 3 overdue (100d), 2 late, non_compliant,
    /// 30-day-old account, 1 violation event, no response data.
    #[test]
    fn scenario_two_matches_expected_factor_scores() {
        let now = Utc::now();
        let landlord = base_landlord(now);
        let payments = vec![
            overdue_payment(now, 100),
            overdue_payment(now, 100),
            overdue_payment(now, 100),
            late_payment(now),
            late_payment(now),
        ];
        let events = vec![ComplianceEvent {
            landlord_id: "landlord-1".to_string(),
            event_type: ComplianceEventType::Violation,
            event_date: now,
            description: "unregistered unit".to_string(),
        }];
        let config = ci_config::ScoringConfig::default();

        let score = score_landlord(&landlord, &payments, &events, &[], &config, now).unwrap();

        let by_name = |name: &str| {
            score
                .factors
                .iter()
                .find(|f| f.name == name)
                .unwrap()
                .score
        };
        assert!((by_name("payment_history") - 34.0).abs() < 1e-9);
        assert!((by_name("registration_compliance") - 10.0).abs() < 1e-9);
        assert!((by_name("account_age") - 35.0).abs() < 1e-9);
        assert!((by_name("compliance_history") - 85.0).abs() < 1e-9);
        assert!((by_name("response_time") - 70.0).abs() < 1e-9);
        assert!(score.overall_score < 60.0);
        assert!(matches!(score.risk_level, RiskLevel::High | RiskLevel::Critical));
    }

    #[test]
    fn factor_weights_sum_to_one() {
        let now = Utc::now();
        let landlord = base_landlord(now);
        let config = ci_config::ScoringConfig::default();
        let score = score_landlord(&landlord, &[], &[], &[], &config, now).unwrap();
        assert!((score.factor_weight_sum() - 1.0).abs() < 1e-3);
        for factor in &score.factors {
            assert!((0.0..=100.0).contains(&factor.score));
        }
        assert!((0.0..=100.0).contains(&score.overall_score));
    }

    #[test]
    fn no_history_defaults_match_spec() {
        let now = Utc::now();
        let landlord = base_landlord(now);
        let config = ci_config::ScoringConfig::default();
        let score = score_landlord(&landlord, &[], &[], &[], &config, now).unwrap();
        let by_name = |name: &str| {
            score
                .factors
                .iter()
                .find(|f| f.name == name)
                .unwrap()
                .score
        };
        assert_eq!(by_name("payment_history"), 50.0);
        assert_eq!(by_name("compliance_history"), 70.0);
        assert_eq!(by_name("response_time"), 70.0);
    }
}
