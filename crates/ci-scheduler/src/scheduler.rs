//! The process-embedded time-trigger (spec.md §4.4): one handle per named
//! job, each polling its own cron expression on a dedicated background
//! loop. `trigger` walks the identical execution path as the cron loop
//! (spec.md §9 REDESIGN FLAGS: "manual trigger goes through the same
//! function path as the cron invocation to guarantee equivalence").

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use cron::Schedule;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::job::{
    run_daily_risk_update, run_monthly_trend_analysis, run_weekly_report, JobContext, JobOutcome,
};
use ci_types::JobHistory;

const CHECK_INTERVAL_SECS: u64 = 30;

async fn dispatch(name: &str, ctx: Arc<JobContext>) -> JobOutcome {
    match name {
        "daily-risk-update" => run_daily_risk_update(ctx).await,
        "weekly-report" => run_weekly_report(ctx).await,
        "monthly-trend-analysis" => run_monthly_trend_analysis(ctx).await,
        other => unreachable!("dispatch called with unregistered job name {other}"),
    }
}

/// Point-in-time snapshot of a named job, returned from `GET /jobs`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct JobInfo {
    pub name: String,
    pub cron_expression: String,
    pub scheduled: bool,
    pub enabled: bool,
    pub last_run_at: Option<DateTime<Utc>>,
    pub next_run_at: Option<DateTime<Utc>>,
}

struct ScheduledEntry {
    name: &'static str,
    cron_expression: String,
    schedule: Option<Schedule>,
    enabled: AtomicBool,
    next_run_at: RwLock<Option<DateTime<Utc>>>,
    last_run_at: RwLock<Option<DateTime<Utc>>>,
}

impl ScheduledEntry {
    fn new(name: &'static str, cron_expression: String) -> Self {
        let schedule = match Schedule::from_str(&cron_expression) {
            Ok(schedule) => Some(schedule),
            Err(e) => {
                warn!(job_name = name, cron_expression = %cron_expression, error = %e, "invalid cron expression; job will not be scheduled");
                None
            }
        };
        let next_run_at = schedule.as_ref().and_then(|s| s.upcoming(Utc).next());
        Self {
            name,
            cron_expression,
            schedule,
            enabled: AtomicBool::new(true),
            next_run_at: RwLock::new(next_run_at),
            last_run_at: RwLock::new(None),
        }
    }

    fn is_scheduled(&self) -> bool {
        self.schedule.is_some()
    }

    async fn should_execute_now(&self) -> bool {
        if !self.enabled.load(Ordering::Relaxed) {
            return false;
        }
        match *self.next_run_at.read().await {
            Some(next) => Utc::now() >= next,
            None => false,
        }
    }

    async fn advance(&self) {
        let now = Utc::now();
        *self.last_run_at.write().await = Some(now);
        if let Some(schedule) = &self.schedule {
            *self.next_run_at.write().await = schedule.upcoming(Utc).next();
        }
    }

    async fn snapshot(&self) -> JobInfo {
        JobInfo {
            name: self.name.to_string(),
            cron_expression: self.cron_expression.clone(),
            scheduled: self.is_scheduled(),
            enabled: self.enabled.load(Ordering::Relaxed),
            last_run_at: *self.last_run_at.read().await,
            next_run_at: *self.next_run_at.read().await,
        }
    }
}

/// Owns the three named jobs and their background polling loops.
pub struct JobScheduler {
    ctx: Arc<JobContext>,
    entries: Vec<Arc<ScheduledEntry>>,
    running: Arc<AtomicBool>,
}

impl JobScheduler {
    pub fn new(ctx: Arc<JobContext>, schedules: &ci_config::JobSchedules) -> Self {
        let entries = vec![
            Arc::new(ScheduledEntry::new(
                "daily-risk-update",
                schedules.daily_risk_update.clone(),
            )),
            Arc::new(ScheduledEntry::new(
                "weekly-report",
                schedules.weekly_report.clone(),
            )),
            Arc::new(ScheduledEntry::new(
                "monthly-trend-analysis",
                schedules.monthly_trend_analysis.clone(),
            )),
        ];
        Self {
            ctx,
            entries,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    fn find(&self, name: &str) -> SchedulerResult<&Arc<ScheduledEntry>> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| SchedulerError::UnknownJob(name.to_string()))
    }

    /// Spawns a background polling loop per scheduled job. Idempotent: a
    /// second call while already running is a no-op.
    pub fn spawn(self: &Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("scheduler already running");
            return;
        }
        for entry in self.entries.clone() {
            if !entry.is_scheduled() {
                continue;
            }
            let scheduler = self.clone();
            tokio::spawn(async move {
                scheduler.poll_loop(entry).await;
            });
        }
        info!("job scheduler started");
    }

    pub fn stop_all(&self) {
        self.running.store(false, Ordering::SeqCst);
        info!("job scheduler stopped");
    }

    async fn poll_loop(self: Arc<Self>, entry: Arc<ScheduledEntry>) {
        while self.running.load(Ordering::SeqCst) {
            if entry.should_execute_now().await {
                self.execute(&entry).await;
            }
            sleep(StdDuration::from_secs(CHECK_INTERVAL_SECS)).await;
        }
    }

    /// Runs `name`'s job body and writes its `JobHistory` row, regardless
    /// of whether this call came from the cron loop or a manual trigger.
    async fn execute(&self, entry: &ScheduledEntry) -> JobOutcome {
        let job_id = Uuid::new_v4().to_string();
        let start_time = Utc::now();
        debug!(job_name = entry.name, job_id = %job_id, "executing job");

        let outcome = dispatch(entry.name, self.ctx.clone()).await;
        entry.advance().await;

        let end_time = Utc::now();
        let history = JobHistory {
            job_id,
            job_name: entry.name.to_string(),
            status: outcome.status,
            start_time,
            end_time,
            duration_ms: (end_time - start_time).num_milliseconds(),
            records_processed: outcome.records_processed,
            errors: outcome.errors.clone(),
        };
        if let Err(e) = self.ctx.store.insert_job_history(&history).await {
            error!(job_name = entry.name, error = %e, "failed to record job history");
        }

        if !outcome.errors.is_empty() {
            warn!(job_name = entry.name, error_count = outcome.errors.len(), "job completed with errors");
        } else {
            info!(job_name = entry.name, records_processed = outcome.records_processed, "job completed");
        }

        outcome
    }

    /// `POST /jobs/:name/trigger` (spec.md §6): runs `name` immediately
    /// through the same `execute` path the cron loop uses. Unknown names
    /// are the caller's responsibility to map to a 400 response.
    pub async fn trigger(&self, name: &str) -> SchedulerResult<JobOutcome> {
        let entry = self.find(name)?;
        Ok(self.execute(entry).await)
    }

    /// `POST /jobs/:name/start` — idempotent per job name (spec.md §9).
    pub fn start_job(&self, name: &str) -> SchedulerResult<()> {
        let entry = self.find(name)?;
        entry.enabled.store(true, Ordering::Relaxed);
        Ok(())
    }

    /// `POST /jobs/:name/stop` — idempotent per job name (spec.md §9).
    pub fn stop_job(&self, name: &str) -> SchedulerResult<()> {
        let entry = self.find(name)?;
        entry.enabled.store(false, Ordering::Relaxed);
        Ok(())
    }

    /// `GET /jobs` (spec.md §6).
    pub async fn list(&self) -> Vec<JobInfo> {
        let mut infos = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            infos.push(entry.snapshot().await);
        }
        infos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ci_query::InMemoryStore;

    fn ctx() -> Arc<JobContext> {
        Arc::new(JobContext {
            store: Arc::new(InMemoryStore::new()),
            scoring: Arc::new(ci_config::ScoringConfig::default()),
        })
    }

    fn schedules() -> ci_config::JobSchedules {
        ci_config::JobSchedules::default()
    }

    #[tokio::test]
    async fn trigger_unknown_job_is_an_error() {
        let scheduler = JobScheduler::new(ctx(), &schedules());
        let result = scheduler.trigger("does-not-exist").await;
        assert!(matches!(result, Err(SchedulerError::UnknownJob(_))));
    }

    #[tokio::test]
    async fn trigger_writes_job_history_unconditionally() {
        let store = Arc::new(InMemoryStore::new());
        let ctx = Arc::new(JobContext {
            store: store.clone(),
            scoring: Arc::new(ci_config::ScoringConfig::default()),
        });
        let scheduler = JobScheduler::new(ctx, &schedules());
        scheduler.trigger("daily-risk-update").await.unwrap();
        let history = store.list_job_history(10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].job_name, "daily-risk-update");
    }

    #[tokio::test]
    async fn start_stop_is_idempotent() {
        let scheduler = JobScheduler::new(ctx(), &schedules());
        scheduler.stop_job("weekly-report").unwrap();
        scheduler.stop_job("weekly-report").unwrap();
        scheduler.start_job("weekly-report").unwrap();
        scheduler.start_job("weekly-report").unwrap();
        let info = scheduler
            .list()
            .await
            .into_iter()
            .find(|j| j.name == "weekly-report")
            .unwrap();
        assert!(info.enabled);
    }

    #[test]
    fn invalid_cron_expression_degrades_to_unscheduled() {
        let entry = ScheduledEntry::new("bad-job", "not a cron expression".to_string());
        assert!(!entry.is_scheduled());
    }
}
