use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ci_types::{
    AreaAssessment, Booking, ComplianceEvent, EnforcementAction, JobHistory, Landlord,
    Notification, PaymentRecord, Property, Report, ReportKind, ResponseTimeSample, RiskScore,
    ScrapedListing,
};

use crate::error::QueryResult;

/// The narrow query interface the rest of the service reads and writes
/// through (spec.md §1, §5: "the persistence store... used through a
/// narrow query interface"). Everything above `CoreError`/`QueryError` is
/// blind to whether the backing store is Postgres or an in-memory double.
///
/// Methods are split exactly along the data model's read-only/owned line:
/// the first group reads external collaborators, the second upserts
/// entities this service alone produces.
#[async_trait]
pub trait ComplianceStore: Send + Sync {
    // ---- read-only collaborators -----------------------------------

    async fn get_landlord(&self, id: &str) -> QueryResult<Option<Landlord>>;
    async fn list_landlords(&self) -> QueryResult<Vec<Landlord>>;

    async fn list_properties_by_landlord(&self, landlord_id: &str) -> QueryResult<Vec<Property>>;
    async fn list_properties_by_city(
        &self,
        city: &str,
        neighborhood: Option<&str>,
    ) -> QueryResult<Vec<Property>>;
    async fn list_all_properties(&self) -> QueryResult<Vec<Property>>;

    async fn list_payments_for_landlord(
        &self,
        landlord_id: &str,
        limit: usize,
    ) -> QueryResult<Vec<PaymentRecord>>;
    async fn list_payments_for_city(
        &self,
        city: &str,
        since: Option<DateTime<Utc>>,
    ) -> QueryResult<Vec<PaymentRecord>>;

    async fn list_compliance_events_for_landlord(
        &self,
        landlord_id: &str,
    ) -> QueryResult<Vec<ComplianceEvent>>;

    async fn list_response_samples_for_landlord(
        &self,
        landlord_id: &str,
        limit: usize,
    ) -> QueryResult<Vec<ResponseTimeSample>>;

    async fn get_listing(&self, id: &str) -> QueryResult<Option<ScrapedListing>>;
    async fn list_listings_by_city(&self, city: &str) -> QueryResult<Vec<ScrapedListing>>;
    async fn list_all_listings(&self) -> QueryResult<Vec<ScrapedListing>>;
    async fn list_unregistered_listings_with_coords(&self) -> QueryResult<Vec<ScrapedListing>>;
    /// Returns `(total_listings_by_host, unregistered_of_those)`.
    async fn count_listings_by_host(&self, host_id: &str) -> QueryResult<(u32, u32)>;

    async fn list_bookings_for_city(&self, city: &str) -> QueryResult<Vec<Booking>>;
    async fn list_bookings_for_landlord(&self, landlord_id: &str) -> QueryResult<Vec<Booking>>;

    async fn list_enforcement_actions_for_city(
        &self,
        city: &str,
    ) -> QueryResult<Vec<EnforcementAction>>;

    async fn list_cities(&self) -> QueryResult<Vec<String>>;

    // ---- owned / derived entities -----------------------------------

    async fn upsert_landlord_risk_score(&self, score: &RiskScore) -> QueryResult<()>;
    async fn get_landlord_risk_score(&self, id: &str) -> QueryResult<Option<RiskScore>>;
    async fn list_landlord_risk_scores(&self) -> QueryResult<Vec<RiskScore>>;

    async fn upsert_listing_risk_score(&self, score: &RiskScore) -> QueryResult<()>;
    async fn get_listing_risk_score(&self, id: &str) -> QueryResult<Option<RiskScore>>;
    async fn list_listing_risk_scores(&self) -> QueryResult<Vec<RiskScore>>;

    async fn upsert_area_assessment(&self, area: &AreaAssessment) -> QueryResult<()>;
    async fn get_area_assessment(
        &self,
        city: &str,
        neighborhood: Option<&str>,
    ) -> QueryResult<Option<AreaAssessment>>;
    async fn list_area_assessments(&self) -> QueryResult<Vec<AreaAssessment>>;

    async fn upsert_report(&self, report: &Report) -> QueryResult<()>;
    async fn get_report(&self, kind: ReportKind, period: &str) -> QueryResult<Option<Report>>;
    async fn list_reports(&self, kind: Option<ReportKind>, limit: usize)
        -> QueryResult<Vec<Report>>;

    async fn insert_job_history(&self, job: &JobHistory) -> QueryResult<()>;
    async fn list_job_history(&self, limit: usize) -> QueryResult<Vec<JobHistory>>;

    async fn upsert_seasonal_patterns(&self, value: &serde_json::Value) -> QueryResult<()>;
    async fn get_seasonal_patterns(&self) -> QueryResult<Option<serde_json::Value>>;
    async fn insert_long_term_trends(&self, value: &serde_json::Value) -> QueryResult<()>;
    async fn insert_monthly_insights(&self, value: &serde_json::Value) -> QueryResult<()>;
    async fn insert_notification(&self, notification: &Notification) -> QueryResult<()>;
}
