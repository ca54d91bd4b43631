//! HTTP surface tests, mounted over an [`InMemoryStore`] with no adapter
//! credentials configured, covering the end-to-end scenarios and testable
//! properties of spec.md §8.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ci_api::AppState;
use ci_config::{Config, Environment, JobSchedules, ProviderCredentials};
use ci_enrichment::EnrichmentOrchestrator;
use ci_query::{ComplianceStore, InMemoryStore};
use ci_scheduler::{JobContext, JobScheduler};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        store_url: "memory".to_string(),
        store_credential: "test".to_string(),
        port: 0,
        environment: Environment::Development,
        enable_scheduled_jobs: false,
        schedules: JobSchedules::default(),
        credentials: ProviderCredentials::default(),
        adapter_timeout: Duration::from_secs(5),
        scoring: ci_config::ScoringConfig::default(),
    }
}

fn test_state() -> AppState {
    let config = Arc::new(test_config());
    let store: Arc<dyn ComplianceStore> = Arc::new(InMemoryStore::new());
    let enrichment = Arc::new(EnrichmentOrchestrator::new(&config.credentials, config.adapter_timeout));
    let job_ctx = Arc::new(JobContext {
        store: store.clone(),
        scoring: Arc::new(config.scoring.clone()),
    });
    let scheduler = Arc::new(JobScheduler::new(job_ctx, &config.schedules));
    AppState {
        store,
        config,
        enrichment,
        scheduler,
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_and_health_are_ok() {
    let app = ci_api::router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let app = ci_api::router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = ci_api::router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/api/does-not-exist").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// spec.md §8 scenario 5: hotspots/bounds with any bound missing is a 400
/// with a specific message, not a silent default.
#[tokio::test]
async fn hotspots_bounds_without_all_four_params_is_400() {
    let app = ci_api::router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/analytics/hotspots/bounds?minLat=14.0&maxLat=15.0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Missing required bounds parameters"));
}

#[tokio::test]
async fn hotspots_bounds_with_all_four_params_succeeds() {
    let app = ci_api::router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/analytics/hotspots/bounds?minLat=14.0&maxLat=15.0&minLon=-18.0&maxLon=-17.0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// spec.md §8 testable property 6: empty firstName/lastName is a 400.
#[tokio::test]
async fn verify_with_empty_names_is_400() {
    let app = ci_api::router(test_state());
    let body = json!({ "firstName": "", "lastName": "Dupont" }).to_string();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/intelligence/verify")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// spec.md §8 scenario 1: verify succeeds with zero adapters configured,
/// falling back to a clear verdict rather than failing the request.
#[tokio::test]
async fn verify_with_no_adapters_configured_succeeds_clear() {
    let app = ci_api::router(test_state());
    let body = json!({ "firstName": "Jean", "lastName": "Dupont" }).to_string();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/intelligence/verify")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    let data = &body["data"];
    assert_eq!(data["status"], json!("clear"));
}

/// spec.md §8 testable property 6: enrichment with phone/email/name all
/// absent is a 400.
#[tokio::test]
async fn enrich_with_nothing_to_look_up_is_400() {
    let app = ci_api::router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/intelligence/enrich")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// spec.md §8 testable property 8: >50 persons is a 400 with the exact
/// wording from the scenario table (scenario 6), exactly 50 succeeds and
/// the per-bucket summary sums to 50.
#[tokio::test]
async fn batch_verify_over_fifty_is_rejected() {
    let app = ci_api::router(test_state());
    let persons: Vec<Value> = (0..51)
        .map(|i| json!({ "firstName": format!("Person{i}"), "lastName": "Test" }))
        .collect();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/intelligence/batch-verify")
                .header("content-type", "application/json")
                .body(Body::from(json!(persons).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Maximum 50 persons per batch request"));
}

#[tokio::test]
async fn batch_verify_exactly_fifty_succeeds_and_summary_sums_to_fifty() {
    let app = ci_api::router(test_state());
    let persons: Vec<Value> = (0..50)
        .map(|i| json!({ "firstName": format!("Person{i}"), "lastName": "Test" }))
        .collect();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/intelligence/batch-verify")
                .header("content-type", "application/json")
                .body(Body::from(json!(persons).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let summary = &body["data"]["summary"];
    let total = summary["clear"].as_u64().unwrap_or(0)
        + summary["review"].as_u64().unwrap_or(0)
        + summary["flagged"].as_u64().unwrap_or(0)
        + summary["blocked"].as_u64().unwrap_or(0);
    assert_eq!(total, 50);
}

/// spec.md §8 testable property 9: trigger of an unknown job name is 400,
/// and start/stop of a real job name is idempotent.
#[tokio::test]
async fn trigger_unknown_job_is_400() {
    let app = ci_api::router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/jobs/does-not-exist/trigger")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn start_stop_job_is_idempotent() {
    let app = ci_api::router(test_state());
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/jobs/daily-risk-update/stop")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/jobs/daily-risk-update/start")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn jobs_list_returns_three_named_jobs() {
    let app = ci_api::router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/jobs").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn landlord_lookup_for_unknown_id_is_404() {
    let app = ci_api::router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/risk/landlord/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reports_history_on_empty_store_returns_empty_list() {
    let app = ci_api::router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/reports/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn weekly_report_without_generate_flag_is_404_on_empty_store() {
    let app = ci_api::router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/reports/weekly")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn weekly_report_with_generate_flag_succeeds() {
    let app = ci_api::router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/reports/weekly?generate=true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_report_kind_is_400() {
    let app = ci_api::router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/reports/quarterly")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
