//! In-memory `ComplianceStore` used by integration tests and local
//! development. Mirrors the upsert-by-natural-key semantics the Postgres
//! adapter gives production traffic (spec.md §5: "Writes are idempotent
//! upserts by natural key").

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::RwLock;

use ci_types::{
    AreaAssessment, Booking, ComplianceEvent, EnforcementAction, JobHistory, Landlord,
    Notification, PaymentRecord, Property, Report, ReportKind, ResponseTimeSample, RiskScore,
    ScrapedListing,
};

use crate::error::QueryResult;
use crate::store::ComplianceStore;

#[derive(Default)]
pub struct InMemoryStore {
    landlords: DashMap<String, Landlord>,
    properties: DashMap<String, Property>,
    payments: DashMap<String, PaymentRecord>,
    compliance_events: DashMap<String, Vec<ComplianceEvent>>,
    response_samples: DashMap<String, Vec<ResponseTimeSample>>,
    listings: DashMap<String, ScrapedListing>,
    bookings_by_city: DashMap<String, Vec<Booking>>,
    bookings_by_landlord: DashMap<String, Vec<Booking>>,
    enforcement_actions: DashMap<String, Vec<EnforcementAction>>,

    landlord_risk_scores: DashMap<String, RiskScore>,
    listing_risk_scores: DashMap<String, RiskScore>,
    area_assessments: DashMap<(String, Option<String>), AreaAssessment>,
    reports: DashMap<(ReportKind, String), Report>,
    job_history: RwLock<Vec<JobHistory>>,
    seasonal_patterns: RwLock<Option<serde_json::Value>>,
    long_term_trends: RwLock<Vec<serde_json::Value>>,
    monthly_insights: RwLock<Vec<serde_json::Value>>,
    notifications: RwLock<Vec<Notification>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_landlord(&self, landlord: Landlord) {
        self.landlords.insert(landlord.id.clone(), landlord);
    }

    pub fn seed_property(&self, property: Property) {
        self.properties.insert(property.id.clone(), property);
    }

    pub fn seed_payment(&self, payment: PaymentRecord) {
        self.payments.insert(payment.id.clone(), payment);
    }

    pub fn seed_compliance_event(&self, event: ComplianceEvent) {
        self.compliance_events
            .entry(event.landlord_id.clone())
            .or_default()
            .push(event);
    }

    pub fn seed_response_sample(&self, landlord_id: &str, sample: ResponseTimeSample) {
        self.response_samples
            .entry(landlord_id.to_string())
            .or_default()
            .push(sample);
    }

    pub fn seed_listing(&self, listing: ScrapedListing) {
        self.listings.insert(listing.id.clone(), listing);
    }

    pub fn seed_booking_for_city(&self, city: &str, booking: Booking) {
        self.bookings_by_city
            .entry(city.to_string())
            .or_default()
            .push(booking);
    }

    pub fn seed_booking_for_landlord(&self, landlord_id: &str, booking: Booking) {
        self.bookings_by_landlord
            .entry(landlord_id.to_string())
            .or_default()
            .push(booking);
    }

    pub fn seed_enforcement_action(&self, action: EnforcementAction) {
        self.enforcement_actions
            .entry(action.city.clone())
            .or_default()
            .push(action);
    }
}

#[async_trait]
impl ComplianceStore for InMemoryStore {
    async fn get_landlord(&self, id: &str) -> QueryResult<Option<Landlord>> {
        Ok(self.landlords.get(id).map(|e| e.value().clone()))
    }

    async fn list_landlords(&self) -> QueryResult<Vec<Landlord>> {
        Ok(self.landlords.iter().map(|e| e.value().clone()).collect())
    }

    async fn list_properties_by_landlord(&self, landlord_id: &str) -> QueryResult<Vec<Property>> {
        Ok(self
            .properties
            .iter()
            .filter(|e| e.value().landlord_id == landlord_id)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn list_properties_by_city(
        &self,
        city: &str,
        neighborhood: Option<&str>,
    ) -> QueryResult<Vec<Property>> {
        Ok(self
            .properties
            .iter()
            .filter(|e| {
                e.value().city == city
                    && neighborhood
                        .map(|n| e.value().neighborhood.as_deref() == Some(n))
                        .unwrap_or(true)
            })
            .map(|e| e.value().clone())
            .collect())
    }

    async fn list_all_properties(&self) -> QueryResult<Vec<Property>> {
        Ok(self.properties.iter().map(|e| e.value().clone()).collect())
    }

    async fn list_payments_for_landlord(
        &self,
        landlord_id: &str,
        limit: usize,
    ) -> QueryResult<Vec<PaymentRecord>> {
        let mut payments: Vec<PaymentRecord> = self
            .payments
            .iter()
            .filter(|e| e.value().landlord_id == landlord_id)
            .map(|e| e.value().clone())
            .collect();
        payments.sort_by_key(|p| std::cmp::Reverse(p.due_date));
        payments.truncate(limit);
        Ok(payments)
    }

    async fn list_payments_for_city(
        &self,
        city: &str,
        since: Option<DateTime<Utc>>,
    ) -> QueryResult<Vec<PaymentRecord>> {
        Ok(self
            .payments
            .iter()
            .filter(|e| {
                e.value().city == city
                    && since.map(|s| e.value().due_date >= s).unwrap_or(true)
            })
            .map(|e| e.value().clone())
            .collect())
    }

    async fn list_compliance_events_for_landlord(
        &self,
        landlord_id: &str,
    ) -> QueryResult<Vec<ComplianceEvent>> {
        Ok(self
            .compliance_events
            .get(landlord_id)
            .map(|e| e.value().clone())
            .unwrap_or_default())
    }

    async fn list_response_samples_for_landlord(
        &self,
        landlord_id: &str,
        limit: usize,
    ) -> QueryResult<Vec<ResponseTimeSample>> {
        let mut samples = self
            .response_samples
            .get(landlord_id)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        samples.truncate(limit);
        Ok(samples)
    }

    async fn get_listing(&self, id: &str) -> QueryResult<Option<ScrapedListing>> {
        Ok(self.listings.get(id).map(|e| e.value().clone()))
    }

    async fn list_listings_by_city(&self, city: &str) -> QueryResult<Vec<ScrapedListing>> {
        Ok(self
            .listings
            .iter()
            .filter(|e| e.value().city == city)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn list_all_listings(&self) -> QueryResult<Vec<ScrapedListing>> {
        Ok(self.listings.iter().map(|e| e.value().clone()).collect())
    }

    async fn list_unregistered_listings_with_coords(&self) -> QueryResult<Vec<ScrapedListing>> {
        Ok(self
            .listings
            .iter()
            .filter(|e| !e.value().matched_registration)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn count_listings_by_host(&self, host_id: &str) -> QueryResult<(u32, u32)> {
        let mut total = 0u32;
        let mut unregistered = 0u32;
        for entry in self.listings.iter() {
            if entry.value().host_id.as_deref() == Some(host_id) {
                total += 1;
                if !entry.value().matched_registration {
                    unregistered += 1;
                }
            }
        }
        Ok((total, unregistered))
    }

    async fn list_bookings_for_city(&self, city: &str) -> QueryResult<Vec<Booking>> {
        Ok(self
            .bookings_by_city
            .get(city)
            .map(|e| e.value().clone())
            .unwrap_or_default())
    }

    async fn list_bookings_for_landlord(&self, landlord_id: &str) -> QueryResult<Vec<Booking>> {
        Ok(self
            .bookings_by_landlord
            .get(landlord_id)
            .map(|e| e.value().clone())
            .unwrap_or_default())
    }

    async fn list_enforcement_actions_for_city(
        &self,
        city: &str,
    ) -> QueryResult<Vec<EnforcementAction>> {
        Ok(self
            .enforcement_actions
            .get(city)
            .map(|e| e.value().clone())
            .unwrap_or_default())
    }

    async fn list_cities(&self) -> QueryResult<Vec<String>> {
        let mut cities: Vec<String> = self
            .properties
            .iter()
            .map(|e| e.value().city.clone())
            .collect();
        cities.sort();
        cities.dedup();
        Ok(cities)
    }

    async fn upsert_landlord_risk_score(&self, score: &RiskScore) -> QueryResult<()> {
        self.landlord_risk_scores
            .insert(score.target_id.clone(), score.clone());
        Ok(())
    }

    async fn get_landlord_risk_score(&self, id: &str) -> QueryResult<Option<RiskScore>> {
        Ok(self.landlord_risk_scores.get(id).map(|e| e.value().clone()))
    }

    async fn list_landlord_risk_scores(&self) -> QueryResult<Vec<RiskScore>> {
        Ok(self
            .landlord_risk_scores
            .iter()
            .map(|e| e.value().clone())
            .collect())
    }

    async fn upsert_listing_risk_score(&self, score: &RiskScore) -> QueryResult<()> {
        self.listing_risk_scores
            .insert(score.target_id.clone(), score.clone());
        Ok(())
    }

    async fn get_listing_risk_score(&self, id: &str) -> QueryResult<Option<RiskScore>> {
        Ok(self.listing_risk_scores.get(id).map(|e| e.value().clone()))
    }

    async fn list_listing_risk_scores(&self) -> QueryResult<Vec<RiskScore>> {
        Ok(self
            .listing_risk_scores
            .iter()
            .map(|e| e.value().clone())
            .collect())
    }

    async fn upsert_area_assessment(&self, area: &AreaAssessment) -> QueryResult<()> {
        self.area_assessments.insert(
            (area.city.clone(), area.neighborhood.clone()),
            area.clone(),
        );
        Ok(())
    }

    async fn get_area_assessment(
        &self,
        city: &str,
        neighborhood: Option<&str>,
    ) -> QueryResult<Option<AreaAssessment>> {
        Ok(self
            .area_assessments
            .get(&(city.to_string(), neighborhood.map(|s| s.to_string())))
            .map(|e| e.value().clone()))
    }

    async fn list_area_assessments(&self) -> QueryResult<Vec<AreaAssessment>> {
        Ok(self
            .area_assessments
            .iter()
            .map(|e| e.value().clone())
            .collect())
    }

    async fn upsert_report(&self, report: &Report) -> QueryResult<()> {
        self.reports
            .insert((report.kind, report.period.clone()), report.clone());
        Ok(())
    }

    async fn get_report(&self, kind: ReportKind, period: &str) -> QueryResult<Option<Report>> {
        Ok(self
            .reports
            .get(&(kind, period.to_string()))
            .map(|e| e.value().clone()))
    }

    async fn list_reports(
        &self,
        kind: Option<ReportKind>,
        limit: usize,
    ) -> QueryResult<Vec<Report>> {
        let mut reports: Vec<Report> = self
            .reports
            .iter()
            .filter(|e| kind.map(|k| e.value().kind == k).unwrap_or(true))
            .map(|e| e.value().clone())
            .collect();
        reports.sort_by_key(|r| std::cmp::Reverse(r.generated_at));
        reports.truncate(limit);
        Ok(reports)
    }

    async fn insert_job_history(&self, job: &JobHistory) -> QueryResult<()> {
        self.job_history.write().unwrap().push(job.clone());
        Ok(())
    }

    async fn list_job_history(&self, limit: usize) -> QueryResult<Vec<JobHistory>> {
        let guard = self.job_history.read().unwrap();
        let mut jobs = guard.clone();
        jobs.sort_by_key(|j| std::cmp::Reverse(j.start_time));
        jobs.truncate(limit);
        Ok(jobs)
    }

    async fn upsert_seasonal_patterns(&self, value: &serde_json::Value) -> QueryResult<()> {
        *self.seasonal_patterns.write().unwrap() = Some(value.clone());
        Ok(())
    }

    async fn get_seasonal_patterns(&self) -> QueryResult<Option<serde_json::Value>> {
        Ok(self.seasonal_patterns.read().unwrap().clone())
    }

    async fn insert_long_term_trends(&self, value: &serde_json::Value) -> QueryResult<()> {
        self.long_term_trends.write().unwrap().push(value.clone());
        Ok(())
    }

    async fn insert_monthly_insights(&self, value: &serde_json::Value) -> QueryResult<()> {
        self.monthly_insights.write().unwrap().push(value.clone());
        Ok(())
    }

    async fn insert_notification(&self, notification: &Notification) -> QueryResult<()> {
        self.notifications.write().unwrap().push(notification.clone());
        Ok(())
    }
}
