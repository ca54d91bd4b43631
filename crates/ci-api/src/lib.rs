//! HTTP surface for the compliance intelligence service (spec.md §6):
//! analytics, risk, reports, intelligence and job-management routes, all
//! behind one `{success, data?, error?, meta?}` envelope.

pub mod envelope;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use ci_config::Environment;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Builds the full router over a constructed [`AppState`] (spec.md §6
/// route table). Kept separate from `main` so integration tests can
/// mount it over an [`ci_query::InMemoryStore`] without a real server.
pub fn router(state: AppState) -> Router {
    let cors = if state.config.environment == Environment::Development {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/api/health", get(handlers::health::health))
        .route("/api/info", get(handlers::health::info))
        .route("/api/analytics/compliance", get(handlers::analytics::compliance))
        .route("/api/analytics/revenue", get(handlers::analytics::revenue))
        .route(
            "/api/analytics/revenue/forecast",
            get(handlers::analytics::revenue_forecast),
        )
        .route("/api/analytics/hotspots", get(handlers::analytics::hotspots))
        .route(
            "/api/analytics/hotspots/bounds",
            get(handlers::analytics::hotspots_bounds),
        )
        .route("/api/analytics/seasonal", get(handlers::analytics::seasonal))
        .route(
            "/api/analytics/demand/predict",
            get(handlers::analytics::demand_predict),
        )
        .route("/api/risk/landlord/:id", get(handlers::risk::landlord))
        .route("/api/risk/landlords", get(handlers::risk::landlords_ranked))
        .route("/api/risk/listing/:id", get(handlers::risk::listing))
        .route(
            "/api/risk/listings/prioritized",
            get(handlers::risk::listings_prioritized),
        )
        .route("/api/risk/area/:city", get(handlers::risk::area))
        .route("/api/risk/areas/ranked", get(handlers::risk::areas_ranked))
        .route(
            "/api/risk/refresh/landlords",
            post(handlers::risk::refresh_landlords),
        )
        .route(
            "/api/risk/refresh/listings",
            post(handlers::risk::refresh_listings),
        )
        .route("/api/reports/:kind", get(handlers::reports::by_kind))
        .route("/api/reports/weekly/:id", get(handlers::reports::weekly_by_id))
        .route(
            "/api/reports/enforcement/targets",
            get(handlers::reports::enforcement_targets),
        )
        .route("/api/reports/history", get(handlers::reports::history))
        .route("/api/intelligence/enrich", post(handlers::intelligence::enrich))
        .route("/api/intelligence/verify", post(handlers::intelligence::verify))
        .route(
            "/api/intelligence/phone-lookup",
            post(handlers::intelligence::phone_lookup),
        )
        .route(
            "/api/intelligence/email-lookup",
            post(handlers::intelligence::email_lookup),
        )
        .route(
            "/api/intelligence/sanctions-check",
            post(handlers::intelligence::sanctions_check),
        )
        .route(
            "/api/intelligence/watchlist-check",
            post(handlers::intelligence::watchlist_check),
        )
        .route(
            "/api/intelligence/pep-check",
            post(handlers::intelligence::pep_check),
        )
        .route(
            "/api/intelligence/batch-verify",
            post(handlers::intelligence::batch_verify),
        )
        .route(
            "/api/intelligence/interpol/:entityId",
            get(handlers::intelligence::interpol_entity),
        )
        .route("/jobs", get(handlers::jobs::list))
        .route("/jobs/:name/trigger", post(handlers::jobs::trigger))
        .route("/jobs/:name/start", post(handlers::jobs::start))
        .route("/jobs/:name/stop", post(handlers::jobs::stop))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
        .with_state(state)
}
