use std::sync::Arc;

use ci_config::Config;
use ci_enrichment::EnrichmentOrchestrator;
use ci_query::{ComplianceStore, PostgresStore};
use ci_scheduler::{JobContext, JobScheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);
    tracing::info!(
        port = config.port,
        environment = ?config.environment,
        scheduled_jobs = config.enable_scheduled_jobs,
        "loaded configuration"
    );

    let store: Arc<dyn ComplianceStore> = Arc::new(PostgresStore::connect(&config.store_url).await?);

    let enrichment = Arc::new(EnrichmentOrchestrator::new(&config.credentials, config.adapter_timeout));

    let scoring = Arc::new(config.scoring.clone());
    let job_ctx = Arc::new(JobContext {
        store: store.clone(),
        scoring: scoring.clone(),
    });
    let scheduler = Arc::new(JobScheduler::new(job_ctx, &config.schedules));
    if config.enable_scheduled_jobs {
        scheduler.spawn();
        tracing::info!("scheduled jobs enabled");
    } else {
        tracing::info!("scheduled jobs disabled (ENABLE_SCHEDULED_JOBS=false)");
    }

    let state = ci_api::AppState {
        store,
        config: config.clone(),
        enrichment,
        scheduler,
    };

    let app = ci_api::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "compliance intelligence service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut handler) => {
                handler.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
