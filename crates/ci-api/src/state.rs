//! Shared application state (grounded on the teacher's `AppState`:
//! Arc-wrapped components handed to every handler via axum's `State`
//! extractor), scoped down to exactly what this service's handlers need.

use std::sync::Arc;

use ci_config::Config;
use ci_enrichment::EnrichmentOrchestrator;
use ci_query::ComplianceStore;
use ci_scheduler::JobScheduler;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ComplianceStore>,
    pub config: Arc<Config>,
    pub enrichment: Arc<EnrichmentOrchestrator>,
    pub scheduler: Arc<JobScheduler>,
}

impl AppState {
    /// A standalone `Arc<ScoringConfig>` for the bulk-recompute helpers in
    /// `ci-scoring::engine`, which take their own handle rather than
    /// borrowing from `Config` (they outlive a single request while a
    /// batch of scorings runs).
    pub fn scoring_config(&self) -> Arc<ci_config::ScoringConfig> {
        Arc::new(self.config.scoring.clone())
    }
}
