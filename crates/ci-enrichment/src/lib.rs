//! OSINT enrichment and identity-verification fan-out, driving the
//! `/api/intelligence/*` surface (spec.md §4.2, §6). Adapters never
//! propagate upstream failures; a down provider degrades its own result,
//! not the request.

mod adapters;
mod error;
mod orchestrator;
mod types;

pub use adapters::{LookupInput, ProviderAdapter};
pub use error::{EnrichmentError, EnrichmentResult};
pub use orchestrator::{EnrichmentOrchestrator, MAX_BATCH_VERIFY_SIZE};
pub use types::{
    AdapterOutcome, BatchVerificationItem, BatchVerificationResponse, BatchVerificationSummary,
    EnrichmentCategory, EnrichmentOptions, EnrichmentRequest, EnrichmentResponse,
    NormalizedIdentity, ProviderError, RiskAssessment, RiskLevel, TaggedValue,
    VerificationOptions, VerificationRequest, VerificationResponse, VerificationStatus,
};

#[cfg(test)]
mod tests {
    use super::*;
    use ci_config::ProviderCredentials;
    use std::time::Duration;

    fn orchestrator() -> EnrichmentOrchestrator {
        EnrichmentOrchestrator::new(&ProviderCredentials::default(), Duration::from_millis(200))
    }

    #[tokio::test]
    async fn enrich_rejects_empty_request() {
        let orchestrator = orchestrator();
        let err = orchestrator
            .enrich(EnrichmentRequest {
                phone: None,
                email: None,
                name: None,
                date_of_birth: None,
                nationality: None,
                options: EnrichmentOptions::default(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichmentError::Validation(_)));
    }

    #[tokio::test]
    async fn enrich_succeeds_with_every_adapter_absent() {
        // Sanctions/watchlist are left disabled here so the assertions stay
        // offline: email.emailrep and phone.local run with no credential at
        // all, email.hibp/email.fullcontact/phone.truecaller/phone.numverify
        // all short-circuit on the missing credential before any request.
        let orchestrator = orchestrator();
        let response = orchestrator
            .enrich(EnrichmentRequest {
                phone: Some("+221701234567".to_string()),
                email: Some("person@example.com".to_string()),
                name: None,
                date_of_birth: None,
                nationality: None,
                options: EnrichmentOptions {
                    phone: Some(true),
                    email: Some(false),
                    sanctions: Some(false),
                    watchlist: Some(false),
                },
            })
            .await
            .expect("enrichment never fails outright even with no credentials configured");
        assert!(response
            .provider_results
            .iter()
            .any(|outcome| outcome.source_name == "phone.local" && outcome.success));
        assert!(response.risk.score <= 100);
    }

    #[tokio::test]
    async fn batch_verify_rejects_more_than_max_size() {
        let orchestrator = orchestrator();
        let requests: Vec<_> = (0..MAX_BATCH_VERIFY_SIZE + 1)
            .map(|i| VerificationRequest {
                first_name: format!("Person{i}"),
                last_name: "Test".to_string(),
                date_of_birth: None,
                nationality: None,
                options: VerificationOptions {
                    sanctions: Some(true),
                    interpol: Some(false),
                    fbi: Some(false),
                    europol: Some(false),
                },
            })
            .collect();
        let err = orchestrator.batch_verify(requests).await.unwrap_err();
        assert!(matches!(err, EnrichmentError::Validation(_)));
    }

    #[tokio::test]
    async fn batch_verify_at_exactly_max_size_sums_to_total() {
        let orchestrator = orchestrator();
        let requests: Vec<_> = (0..MAX_BATCH_VERIFY_SIZE)
            .map(|i| VerificationRequest {
                first_name: format!("Person{i}"),
                last_name: "Test".to_string(),
                date_of_birth: None,
                nationality: None,
                options: VerificationOptions {
                    sanctions: Some(true),
                    interpol: Some(false),
                    fbi: Some(false),
                    europol: Some(false),
                },
            })
            .collect();
        let response = orchestrator.batch_verify(requests).await.unwrap();
        assert_eq!(response.results.len(), MAX_BATCH_VERIFY_SIZE);
        assert_eq!(response.summary.total(), MAX_BATCH_VERIFY_SIZE);
    }

    #[tokio::test]
    async fn verify_with_no_credentials_configured_defaults_to_clear() {
        // Sanctions/PEP adapters are credential-gated and report
        // `not_configured` with no network call; INTERPOL/FBI/Europol are
        // public APIs and are disabled here so this test stays offline.
        let orchestrator = orchestrator();
        let response = orchestrator
            .verify(VerificationRequest {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                date_of_birth: None,
                nationality: None,
                options: VerificationOptions {
                    sanctions: Some(true),
                    interpol: Some(false),
                    fbi: Some(false),
                    europol: Some(false),
                },
            })
            .await;
        assert_eq!(response.status, VerificationStatus::Clear);
        assert!(!response.recommendations.is_empty());
        assert!(response
            .provider_results
            .iter()
            .all(|outcome| outcome.error.as_deref() == Some("not configured")));
    }

    #[tokio::test]
    async fn phone_lookup_runs_only_the_phone_group() {
        let orchestrator = orchestrator();
        let outcomes = orchestrator
            .phone_lookup("+221701234567".to_string())
            .await
            .unwrap();
        assert!(outcomes.iter().any(|o| o.source_name == "phone.local"));
        assert!(outcomes.iter().all(|o| !o.source_name.starts_with("email.")));
    }

    #[tokio::test]
    async fn pep_check_reports_not_configured_without_credentials() {
        let orchestrator = orchestrator();
        let outcome = orchestrator
            .pep_check("Jane".to_string(), "Doe".to_string(), None, None)
            .await
            .unwrap();
        assert_eq!(outcome.source_name, "sanctions.pep");
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn watchlist_check_includes_interpol_and_fbi() {
        let orchestrator = orchestrator();
        let outcomes = orchestrator
            .watchlist_check("Jane".to_string(), "Doe".to_string(), None, None)
            .await
            .unwrap();
        let names: Vec<_> = outcomes.iter().map(|o| o.source_name.as_str()).collect();
        assert!(names.contains(&"watchlist.interpol"));
        assert!(names.contains(&"watchlist.fbi"));
    }
}
