//! The three named jobs (spec.md §4.4): `daily-risk-update`,
//! `weekly-report` and `monthly-trend-analysis`. Each is a plain async
//! function over a [`JobContext`]; [`crate::scheduler::JobScheduler`]
//! wires the same function to both its cron trigger and its manual
//! `POST /jobs/:name/trigger` path, so the two invocations are
//! indistinguishable (spec.md §9 REDESIGN FLAGS).

use std::sync::Arc;

use chrono::Utc;
use ci_query::ComplianceStore;
use ci_types::{AlertSeverity, Booking, JobError, JobStatus, Notification};

const BULK_SCORING_CONCURRENCY: usize = 16;

/// Everything a job needs: the store and the externalised scoring
/// configuration (spec.md §9 "replace module-level configuration values
/// with a single Config struct... no globals").
pub struct JobContext {
    pub store: Arc<dyn ComplianceStore>,
    pub scoring: Arc<ci_config::ScoringConfig>,
}

/// What a job hands back before the scheduler wraps it into a
/// `JobHistory` row (spec.md §4.4: "returns a JobResult... writes a row
/// to job_history unconditionally").
pub struct JobOutcome {
    pub status: JobStatus,
    pub records_processed: u64,
    pub errors: Vec<JobError>,
}

impl JobOutcome {
    fn from_counts(records_processed: u64, errors: Vec<JobError>) -> Self {
        let status = if errors.is_empty() {
            JobStatus::Success
        } else if records_processed > 0 {
            JobStatus::Partial
        } else {
            JobStatus::Failed
        };
        Self {
            status,
            records_processed,
            errors,
        }
    }
}

fn job_error(context: impl Into<String>, message: impl Into<String>) -> JobError {
    JobError {
        timestamp: Utc::now(),
        message: message.into(),
        context: context.into(),
    }
}

/// `daily-risk-update` (spec.md §4.4): recomputes every landlord and
/// listing risk score with bounded concurrency, upserting as it goes.
/// One entity's failure never aborts the rest of the batch.
pub async fn run_daily_risk_update(ctx: Arc<JobContext>) -> JobOutcome {
    let mut records_processed = 0u64;
    let mut errors = Vec::new();

    let (landlord_scores, landlord_score_errors) = ci_scoring::engine::recompute_all_landlord_scores(
        ctx.store.clone(),
        ctx.scoring.clone(),
        BULK_SCORING_CONCURRENCY,
    )
    .await;
    for (id, message) in landlord_score_errors {
        errors.push(job_error(format!("landlord:{id}"), message));
    }
    for score in &landlord_scores {
        match ctx.store.upsert_landlord_risk_score(score).await {
            Ok(()) => records_processed += 1,
            Err(e) => errors.push(job_error(format!("landlord:{}", score.target_id), e.to_string())),
        }
    }

    let (listing_scores, listing_score_errors) = ci_scoring::engine::recompute_all_listing_scores(
        ctx.store.clone(),
        ctx.scoring.clone(),
        BULK_SCORING_CONCURRENCY,
    )
    .await;
    for (city, message) in listing_score_errors {
        errors.push(job_error(format!("city:{city}"), message));
    }
    for score in &listing_scores {
        match ctx.store.upsert_listing_risk_score(score).await {
            Ok(()) => records_processed += 1,
            Err(e) => errors.push(job_error(format!("listing:{}", score.target_id), e.to_string())),
        }
    }

    JobOutcome::from_counts(records_processed, errors)
}

/// `weekly-report` (spec.md §4.4): generates the weekly and enforcement
/// reports; critical alerts on the weekly report enqueue notification
/// rows.
pub async fn run_weekly_report(ctx: Arc<JobContext>) -> JobOutcome {
    let mut records_processed = 0u64;
    let mut errors = Vec::new();
    let now = Utc::now();

    match ci_reports::generate_weekly_report(ctx.store.as_ref(), now).await {
        Ok(report) => {
            records_processed += 1;
            for alert in report.alerts.iter().filter(|a| a.severity == AlertSeverity::Critical) {
                let notification = Notification {
                    id: uuid::Uuid::new_v4().to_string(),
                    created_at: now,
                    source_report_id: report.id.clone(),
                    severity: "critical".to_string(),
                    message: alert.message.clone(),
                };
                match ctx.store.insert_notification(&notification).await {
                    Ok(()) => records_processed += 1,
                    Err(e) => errors.push(job_error("notification", e.to_string())),
                }
            }
        }
        Err(e) => errors.push(job_error("weekly-report", e.to_string())),
    }

    match ci_reports::generate_enforcement_report(ctx.store.as_ref(), &ctx.scoring, now).await {
        Ok(_) => records_processed += 1,
        Err(e) => errors.push(job_error("enforcement-report", e.to_string())),
    }

    JobOutcome::from_counts(records_processed, errors)
}

/// `monthly-trend-analysis` (spec.md §4.4): generates the monthly
/// report, recomputes `seasonal_patterns` and `area_rankings`, and
/// stores `long_term_trends`/`monthly_insights` snapshots.
pub async fn run_monthly_trend_analysis(ctx: Arc<JobContext>) -> JobOutcome {
    let mut records_processed = 0u64;
    let mut errors = Vec::new();
    let now = Utc::now();

    match ci_reports::generate_monthly_report(ctx.store.as_ref(), &ctx.scoring, now, None, None).await {
        Ok(_) => records_processed += 1,
        Err(e) => errors.push(job_error("monthly-report", e.to_string())),
    }

    let cities = match ctx.store.list_cities().await {
        Ok(cities) => cities,
        Err(e) => {
            errors.push(job_error("list_cities", e.to_string()));
            Vec::new()
        }
    };

    let mut combined_bookings: Vec<Booking> = Vec::new();
    for city in &cities {
        match ci_scoring::engine::assess_area_by_city(ctx.store.as_ref(), city, None, &ctx.scoring).await {
            Ok(assessment) => match ctx.store.upsert_area_assessment(&assessment).await {
                Ok(()) => records_processed += 1,
                Err(e) => errors.push(job_error(format!("area_ranking:{city}"), e.to_string())),
            },
            Err(e) => errors.push(job_error(format!("area_ranking:{city}"), e.to_string())),
        }
        match ctx.store.list_bookings_for_city(city).await {
            Ok(bookings) => combined_bookings.extend(bookings),
            Err(e) => errors.push(job_error(format!("bookings:{city}"), e.to_string())),
        }
    }

    let seasonal = ci_scoring::analyze_seasonality(&combined_bookings, now.date_naive(), &ctx.scoring);
    match serde_json::to_value(&seasonal) {
        Ok(value) => match ctx.store.upsert_seasonal_patterns(&value).await {
            Ok(()) => records_processed += 1,
            Err(e) => errors.push(job_error("seasonal_patterns", e.to_string())),
        },
        Err(e) => errors.push(job_error("seasonal_patterns", e.to_string())),
    }

    let long_term_trends = serde_json::json!({
        "generated_at": now,
        "cities_assessed": cities.len(),
        "seasonality_index": seasonal.seasonality_index,
        "year_over_year_trend_pct": seasonal.year_over_year_trend_pct,
    });
    if let Err(e) = ctx.store.insert_long_term_trends(&long_term_trends).await {
        errors.push(job_error("long_term_trends", e.to_string()));
    } else {
        records_processed += 1;
    }

    let landlord_scores = ctx.store.list_landlord_risk_scores().await.unwrap_or_default();
    let listing_scores = ctx.store.list_listing_risk_scores().await.unwrap_or_default();
    let hotspots = ci_scoring::engine::detect_hotspots_all(ctx.store.as_ref(), &ctx.scoring)
        .await
        .unwrap_or_default();
    let monthly_insights = serde_json::json!({
        "generated_at": now,
        "high_risk_landlord_count": landlord_scores.iter().filter(|s| matches!(s.risk_level, ci_types::RiskLevel::High | ci_types::RiskLevel::Critical)).count(),
        "high_risk_listing_count": listing_scores.iter().filter(|s| matches!(s.risk_level, ci_types::RiskLevel::High | ci_types::RiskLevel::Critical)).count(),
        "top_hotspot": hotspots.first(),
    });
    if let Err(e) = ctx.store.insert_monthly_insights(&monthly_insights).await {
        errors.push(job_error("monthly_insights", e.to_string()));
    } else {
        records_processed += 1;
    }

    JobOutcome::from_counts(records_processed, errors)
}
