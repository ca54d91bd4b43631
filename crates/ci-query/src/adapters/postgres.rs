//! PostgreSQL-backed `ComplianceStore`.
//!
//! Every table follows the same shape regardless of whether the row is
//! read-only (synced in from the property-management/TPT/scraper systems)
//! or owned by this service:
//!
//! ```sql
//! CREATE TABLE <table> (
//!     id TEXT PRIMARY KEY,
//!     data JSONB NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! `data` carries the whole domain entity; the anti-corruption layer is
//! just serde in and out of it, so adding a field to a domain type never
//! needs a migration. Queries that need to filter on a field reach into
//! the JSONB document with `data->>'field'` rather than promoting the
//! field to its own column.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, instrument};

use ci_types::{
    AreaAssessment, Booking, ComplianceEvent, EnforcementAction, JobHistory, Landlord,
    Notification, PaymentRecord, Property, Report, ReportKind, ResponseTimeSample, RiskScore,
    ScrapedListing,
};

use crate::error::QueryResult;
use crate::store::ComplianceStore;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects with the default pool sizing used across the service.
    pub async fn connect(database_url: &str) -> QueryResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn fetch_all<T>(pool: &PgPool, table: &str) -> QueryResult<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    let sql = format!("SELECT data FROM {table} ORDER BY created_at ASC");
    let rows: Vec<(Json<T>,)> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(rows.into_iter().map(|(Json(v),)| v).collect())
}

async fn fetch_where_eq<T>(
    pool: &PgPool,
    table: &str,
    field: &str,
    value: &str,
) -> QueryResult<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    let sql = format!(
        "SELECT data FROM {table} WHERE data->>'{field}' = $1 ORDER BY created_at ASC"
    );
    let rows: Vec<(Json<T>,)> = sqlx::query_as(&sql).bind(value).fetch_all(pool).await?;
    Ok(rows.into_iter().map(|(Json(v),)| v).collect())
}

async fn fetch_by_id<T>(pool: &PgPool, table: &str, id: &str) -> QueryResult<Option<T>>
where
    T: serde::de::DeserializeOwned,
{
    let sql = format!("SELECT data FROM {table} WHERE id = $1");
    let row: Option<(Json<T>,)> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.map(|(Json(v),)| v))
}

async fn upsert<T>(pool: &PgPool, table: &str, id: &str, entity: &T) -> QueryResult<()>
where
    T: serde::Serialize,
{
    let data = Json(entity);
    let sql = format!(
        "INSERT INTO {table} (id, data, created_at, updated_at)
         VALUES ($1, $2, NOW(), NOW())
         ON CONFLICT (id)
         DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()"
    );
    sqlx::query(&sql)
        .bind(id)
        .bind(data)
        .execute(pool)
        .await?;
    Ok(())
}

async fn append<T>(pool: &PgPool, table: &str, id: &str, entity: &T) -> QueryResult<()>
where
    T: serde::Serialize,
{
    upsert(pool, table, id, entity).await
}

#[async_trait]
impl ComplianceStore for PostgresStore {
    async fn get_landlord(&self, id: &str) -> QueryResult<Option<Landlord>> {
        fetch_by_id(&self.pool, "landlords", id).await
    }

    async fn list_landlords(&self) -> QueryResult<Vec<Landlord>> {
        fetch_all(&self.pool, "landlords").await
    }

    async fn list_properties_by_landlord(&self, landlord_id: &str) -> QueryResult<Vec<Property>> {
        fetch_where_eq(&self.pool, "properties", "landlord_id", landlord_id).await
    }

    #[instrument(skip(self))]
    async fn list_properties_by_city(
        &self,
        city: &str,
        neighborhood: Option<&str>,
    ) -> QueryResult<Vec<Property>> {
        debug!("listing properties for city");
        let mut properties: Vec<Property> = fetch_where_eq(&self.pool, "properties", "city", city).await?;
        if let Some(n) = neighborhood {
            properties.retain(|p| p.neighborhood.as_deref() == Some(n));
        }
        Ok(properties)
    }

    async fn list_all_properties(&self) -> QueryResult<Vec<Property>> {
        fetch_all(&self.pool, "properties").await
    }

    async fn list_payments_for_landlord(
        &self,
        landlord_id: &str,
        limit: usize,
    ) -> QueryResult<Vec<PaymentRecord>> {
        let mut payments: Vec<PaymentRecord> =
            fetch_where_eq(&self.pool, "payments", "landlord_id", landlord_id).await?;
        payments.sort_by_key(|p| std::cmp::Reverse(p.due_date));
        payments.truncate(limit);
        Ok(payments)
    }

    async fn list_payments_for_city(
        &self,
        city: &str,
        since: Option<DateTime<Utc>>,
    ) -> QueryResult<Vec<PaymentRecord>> {
        let mut payments: Vec<PaymentRecord> = fetch_where_eq(&self.pool, "payments", "city", city).await?;
        if let Some(since) = since {
            payments.retain(|p| p.due_date >= since);
        }
        Ok(payments)
    }

    async fn list_compliance_events_for_landlord(
        &self,
        landlord_id: &str,
    ) -> QueryResult<Vec<ComplianceEvent>> {
        fetch_where_eq(&self.pool, "compliance_events", "landlord_id", landlord_id).await
    }

    async fn list_response_samples_for_landlord(
        &self,
        landlord_id: &str,
        limit: usize,
    ) -> QueryResult<Vec<ResponseTimeSample>> {
        let mut samples: Vec<ResponseTimeSample> =
            fetch_where_eq(&self.pool, "response_time_samples", "landlord_id", landlord_id).await?;
        samples.truncate(limit);
        Ok(samples)
    }

    async fn get_listing(&self, id: &str) -> QueryResult<Option<ScrapedListing>> {
        fetch_by_id(&self.pool, "scraped_listings", id).await
    }

    async fn list_listings_by_city(&self, city: &str) -> QueryResult<Vec<ScrapedListing>> {
        fetch_where_eq(&self.pool, "scraped_listings", "city", city).await
    }

    async fn list_all_listings(&self) -> QueryResult<Vec<ScrapedListing>> {
        fetch_all(&self.pool, "scraped_listings").await
    }

    async fn list_unregistered_listings_with_coords(&self) -> QueryResult<Vec<ScrapedListing>> {
        let listings: Vec<ScrapedListing> = fetch_all(&self.pool, "scraped_listings").await?;
        Ok(listings
            .into_iter()
            .filter(|l| !l.matched_registration)
            .collect())
    }

    async fn count_listings_by_host(&self, host_id: &str) -> QueryResult<(u32, u32)> {
        let listings: Vec<ScrapedListing> =
            fetch_where_eq(&self.pool, "scraped_listings", "host_id", host_id).await?;
        let total = listings.len() as u32;
        let unregistered = listings.iter().filter(|l| !l.matched_registration).count() as u32;
        Ok((total, unregistered))
    }

    async fn list_bookings_for_city(&self, city: &str) -> QueryResult<Vec<Booking>> {
        fetch_where_eq(&self.pool, "bookings", "city", city).await
    }

    async fn list_bookings_for_landlord(&self, landlord_id: &str) -> QueryResult<Vec<Booking>> {
        fetch_where_eq(&self.pool, "bookings", "landlord_id", landlord_id).await
    }

    async fn list_enforcement_actions_for_city(
        &self,
        city: &str,
    ) -> QueryResult<Vec<EnforcementAction>> {
        fetch_where_eq(&self.pool, "enforcement_actions", "city", city).await
    }

    async fn list_cities(&self) -> QueryResult<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT data->>'city' FROM properties ORDER BY 1")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(city,)| city).collect())
    }

    async fn upsert_landlord_risk_score(&self, score: &RiskScore) -> QueryResult<()> {
        upsert(&self.pool, "landlord_risk_scores", &score.target_id, score).await
    }

    async fn get_landlord_risk_score(&self, id: &str) -> QueryResult<Option<RiskScore>> {
        fetch_by_id(&self.pool, "landlord_risk_scores", id).await
    }

    async fn list_landlord_risk_scores(&self) -> QueryResult<Vec<RiskScore>> {
        fetch_all(&self.pool, "landlord_risk_scores").await
    }

    async fn upsert_listing_risk_score(&self, score: &RiskScore) -> QueryResult<()> {
        upsert(&self.pool, "listing_risk_scores", &score.target_id, score).await
    }

    async fn get_listing_risk_score(&self, id: &str) -> QueryResult<Option<RiskScore>> {
        fetch_by_id(&self.pool, "listing_risk_scores", id).await
    }

    async fn list_listing_risk_scores(&self) -> QueryResult<Vec<RiskScore>> {
        fetch_all(&self.pool, "listing_risk_scores").await
    }

    async fn upsert_area_assessment(&self, area: &AreaAssessment) -> QueryResult<()> {
        let key = area_key(&area.city, area.neighborhood.as_deref());
        upsert(&self.pool, "area_assessments", &key, area).await
    }

    async fn get_area_assessment(
        &self,
        city: &str,
        neighborhood: Option<&str>,
    ) -> QueryResult<Option<AreaAssessment>> {
        let key = area_key(city, neighborhood);
        fetch_by_id(&self.pool, "area_assessments", &key).await
    }

    async fn list_area_assessments(&self) -> QueryResult<Vec<AreaAssessment>> {
        fetch_all(&self.pool, "area_assessments").await
    }

    async fn upsert_report(&self, report: &Report) -> QueryResult<()> {
        let key = report_key(report.kind, &report.period);
        upsert(&self.pool, "reports", &key, report).await
    }

    async fn get_report(&self, kind: ReportKind, period: &str) -> QueryResult<Option<Report>> {
        let key = report_key(kind, period);
        fetch_by_id(&self.pool, "reports", &key).await
    }

    async fn list_reports(
        &self,
        kind: Option<ReportKind>,
        limit: usize,
    ) -> QueryResult<Vec<Report>> {
        let mut reports: Vec<Report> = match kind {
            Some(kind) => {
                let kind_str = match kind {
                    ReportKind::Weekly => "weekly",
                    ReportKind::Monthly => "monthly",
                    ReportKind::Enforcement => "enforcement",
                };
                fetch_where_eq(&self.pool, "reports", "kind", kind_str).await?
            }
            None => fetch_all(&self.pool, "reports").await?,
        };
        reports.sort_by_key(|r| std::cmp::Reverse(r.generated_at));
        reports.truncate(limit);
        Ok(reports)
    }

    async fn insert_job_history(&self, job: &JobHistory) -> QueryResult<()> {
        let id = format!("{}-{}", job.job_name, job.start_time.timestamp_millis());
        append(&self.pool, "job_history", &id, job).await
    }

    async fn list_job_history(&self, limit: usize) -> QueryResult<Vec<JobHistory>> {
        let mut jobs: Vec<JobHistory> = fetch_all(&self.pool, "job_history").await?;
        jobs.sort_by_key(|j| std::cmp::Reverse(j.start_time));
        jobs.truncate(limit);
        Ok(jobs)
    }

    async fn upsert_seasonal_patterns(&self, value: &serde_json::Value) -> QueryResult<()> {
        upsert(&self.pool, "seasonal_patterns", "singleton", value).await
    }

    async fn get_seasonal_patterns(&self) -> QueryResult<Option<serde_json::Value>> {
        fetch_by_id(&self.pool, "seasonal_patterns", "singleton").await
    }

    async fn insert_long_term_trends(&self, value: &serde_json::Value) -> QueryResult<()> {
        let id = format!("trend-{}", uuid::Uuid::new_v4());
        append(&self.pool, "long_term_trends", &id, value).await
    }

    async fn insert_monthly_insights(&self, value: &serde_json::Value) -> QueryResult<()> {
        let id = format!("insight-{}", uuid::Uuid::new_v4());
        append(&self.pool, "monthly_insights", &id, value).await
    }

    async fn insert_notification(&self, notification: &Notification) -> QueryResult<()> {
        append(&self.pool, "notifications", &notification.id, notification).await
    }
}

fn area_key(city: &str, neighborhood: Option<&str>) -> String {
    match neighborhood {
        Some(n) => format!("{city}::{n}"),
        None => city.to_string(),
    }
}

fn report_key(kind: ReportKind, period: &str) -> String {
    let kind_str = match kind {
        ReportKind::Weekly => "weekly",
        ReportKind::Monthly => "monthly",
        ReportKind::Enforcement => "enforcement",
    };
    format!("{kind_str}-{period}")
}
