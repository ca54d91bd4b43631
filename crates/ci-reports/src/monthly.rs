//! Monthly report generator (spec.md §4.3 "Monthly"): aggregates
//! compliance, revenue, hotspots, seasonality and a risk summary, then
//! derives recommendations from fixed threshold rules.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use ci_config::ScoringConfig;
use ci_query::ComplianceStore;
use ci_types::{
    AlertSeverity, Booking, PropertyRegistrationStatus, Report, ReportAlert, ReportKind,
    ReportMetric, RiskLevel, TptPaymentStatus,
};

use crate::error::ReportResult;

const COMPLIANCE_CAMPAIGN_THRESHOLD: f64 = 75.0;
const HIGH_RISK_LANDLORD_THRESHOLD: usize = 10;
const HIGH_RISK_LISTING_THRESHOLD: usize = 50;

fn is_high_risk(level: RiskLevel) -> bool {
    matches!(level, RiskLevel::High | RiskLevel::Critical)
}

/// Recomputes the monthly report for `year`/`month` (defaulting to the
/// calendar month containing `now`) and upserts it by period key
/// `monthly-YYYY-MM` (spec.md §4.3, §5).
pub async fn generate_monthly_report(
    store: &dyn ComplianceStore,
    config: &ScoringConfig,
    now: DateTime<Utc>,
    year: Option<i32>,
    month: Option<u32>,
) -> ReportResult<Report> {
    let year = year.unwrap_or_else(|| now.year());
    let month = month.unwrap_or_else(|| now.month());
    let period = format!("{year:04}-{month:02}");
    let month_start = NaiveDate::from_ymd_opt(year, month, 1).expect("valid year/month");

    let cities = store.list_cities().await?;

    let properties = store.list_all_properties().await?;
    let total_properties = properties.len() as f64;
    let registered = properties
        .iter()
        .filter(|p| matches!(p.registration_status, PropertyRegistrationStatus::Registered))
        .count() as f64;
    let compliance_rate = if total_properties > 0.0 {
        registered / total_properties * 100.0
    } else {
        100.0
    };

    let landlord_scores = store.list_landlord_risk_scores().await?;
    let listing_scores = store.list_listing_risk_scores().await?;
    let high_risk_landlords = landlord_scores
        .iter()
        .filter(|s| is_high_risk(s.risk_level))
        .count();
    let high_risk_listings = listing_scores
        .iter()
        .filter(|s| is_high_risk(s.risk_level))
        .count();

    let hotspots = ci_scoring::engine::detect_hotspots_all(store, config).await?;
    let top_hotspot = hotspots.first().cloned();

    let mut predicted_revenue_next_month = 0.0_f64;
    let mut actual_revenue_this_month = 0.0_f64;
    let mut combined_bookings: Vec<Booking> = Vec::new();
    for city in &cities {
        let forecast = ci_scoring::engine::forecast_city_revenue(store, city, 1, config).await?;
        if let Some(point) = forecast.first() {
            predicted_revenue_next_month += point.predicted;
        }

        let payments = store.list_payments_for_city(city, None).await?;
        actual_revenue_this_month += payments
            .iter()
            .filter(|p| {
                matches!(p.status, TptPaymentStatus::Completed)
                    && p.paid_date
                        .is_some_and(|d| d.year() == year && d.month() == month)
            })
            .map(|p| p.amount)
            .sum::<f64>();

        combined_bookings.extend(store.list_bookings_for_city(city).await?);
    }
    let revenue_growth_pct = if actual_revenue_this_month > 0.0 {
        (predicted_revenue_next_month - actual_revenue_this_month) / actual_revenue_this_month * 100.0
    } else {
        0.0
    };

    let seasonality = ci_scoring::analyze_seasonality(&combined_bookings, month_start, config);

    let mut recommendations = Vec::new();
    if compliance_rate < COMPLIANCE_CAMPAIGN_THRESHOLD {
        recommendations.push("Launch a registration compliance campaign".to_string());
    }
    if revenue_growth_pct < 0.0 {
        recommendations.push("Investigate declining tax collections".to_string());
    }
    if let Some(hotspot) = &top_hotspot {
        recommendations.push(format!(
            "Focus enforcement resources in {}",
            hotspot.primary_city
        ));
    }
    if high_risk_landlords > HIGH_RISK_LANDLORD_THRESHOLD {
        recommendations.push("Apply enhanced monitoring to high-risk landlords".to_string());
    }
    if high_risk_listings > HIGH_RISK_LISTING_THRESHOLD {
        recommendations.push("Prioritise investigations into high-risk listings".to_string());
    }
    if recommendations.is_empty() {
        recommendations.push("Continue the standard monthly monitoring cadence".to_string());
    }

    let mut alerts = Vec::new();
    if compliance_rate < 60.0 {
        alerts.push(ReportAlert {
            severity: AlertSeverity::Critical,
            message: format!("Compliance rate at {compliance_rate:.1}% across all cities"),
        });
    }
    if revenue_growth_pct < -10.0 {
        alerts.push(ReportAlert {
            severity: AlertSeverity::Warning,
            message: format!("Revenue trending down {revenue_growth_pct:.1}% month-over-month"),
        });
    }

    let metrics = vec![
        ReportMetric {
            name: "compliance_rate".to_string(),
            value: compliance_rate,
            unit: "%".to_string(),
            change: None,
            trend: None,
        },
        ReportMetric {
            name: "predicted_revenue_next_month".to_string(),
            value: predicted_revenue_next_month,
            unit: "currency".to_string(),
            change: Some(revenue_growth_pct),
            trend: Some(if revenue_growth_pct >= 0.0 { "up".to_string() } else { "down".to_string() }),
        },
        ReportMetric {
            name: "high_risk_landlords".to_string(),
            value: high_risk_landlords as f64,
            unit: "count".to_string(),
            change: None,
            trend: None,
        },
        ReportMetric {
            name: "high_risk_listings".to_string(),
            value: high_risk_listings as f64,
            unit: "count".to_string(),
            change: None,
            trend: None,
        },
        ReportMetric {
            name: "hotspot_count".to_string(),
            value: hotspots.len() as f64,
            unit: "count".to_string(),
            change: None,
            trend: None,
        },
        ReportMetric {
            name: "seasonality_index".to_string(),
            value: seasonality.seasonality_index,
            unit: "ratio".to_string(),
            change: None,
            trend: None,
        },
    ];

    let highlights = if high_risk_landlords == 0 && high_risk_listings == 0 {
        vec!["No high-risk landlords or listings this cycle".to_string()]
    } else {
        Vec::new()
    };
    let concerns: Vec<String> = alerts.iter().map(|a| a.message.clone()).collect();

    let analytics = serde_json::json!({
        "hotspots": hotspots,
        "seasonality": seasonality,
        "actual_revenue_this_month": actual_revenue_this_month,
        "cities_covered": cities.len(),
    });

    let report = Report {
        id: format!("monthly-{period}"),
        kind: ReportKind::Monthly,
        period,
        generated_at: now,
        headline: format!(
            "Monthly review: {compliance_rate:.1}% compliant, {high_risk_landlords} high-risk landlords, {} hotspots",
            hotspots.len()
        ),
        metrics,
        highlights,
        concerns,
        analytics,
        alerts,
        recommendations,
    };

    store.upsert_report(&report).await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ci_query::InMemoryStore;

    #[tokio::test]
    async fn empty_store_still_produces_a_reportable_document() {
        let store = InMemoryStore::new();
        let config = ScoringConfig::default();
        let report = generate_monthly_report(&store, &config, Utc::now(), None, None)
            .await
            .unwrap();
        assert_eq!(report.kind, ReportKind::Monthly);
        assert!(!report.recommendations.is_empty());
    }

    #[tokio::test]
    async fn explicit_year_month_drives_the_period_key() {
        let store = InMemoryStore::new();
        let config = ScoringConfig::default();
        let report = generate_monthly_report(&store, &config, Utc::now(), Some(2025), Some(3))
            .await
            .unwrap();
        assert_eq!(report.period, "2025-03");
        assert_eq!(report.id, "monthly-2025-03");
    }
}
