//! Load broker HTTP server
//!
//! Main entry point: configuration, storage, geocoder, router, serve.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::{GeocodingPort, LoadStore};
use infrastructure::{
    AppConfig, GeocodingAdapter, SqliteLoadStore, create_pool, init_tracing, seed_sample_data,
    telemetry::DEFAULT_LOG_FILTER,
};
use presentation_http::{AppState, create_app, set_expose_internal_errors};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(config.server.log_format, DEFAULT_LOG_FILTER)?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Load broker starting"
    );

    set_expose_internal_errors(!config.is_production());
    if config.security.effective_api_key().is_none() {
        warn!("No API key configured (LOADBROKER_SECURITY__API_KEY); authentication is disabled");
    }

    let pool = create_pool(&config.database).context("Failed to open database")?;
    if config.database.seed_sample_data {
        let inserted = seed_sample_data(&pool).context("Failed to seed sample loads")?;
        if inserted > 0 {
            info!(inserted, "Seeded sample loads");
        }
    }
    let store: Arc<dyn LoadStore> = Arc::new(SqliteLoadStore::new(Arc::new(pool)));

    let geocoder: Arc<dyn GeocodingPort> = Arc::new(
        GeocodingAdapter::new(&config.geocoding, config.retry.to_retry_config())
            .map_err(|e| anyhow::anyhow!("Failed to initialize geocoder: {e}"))?,
    );

    let state = AppState::new(store, geocoder, &config);
    let app = create_app(state, &config);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Server listening");

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }

    info!(timeout_secs = timeout.as_secs(), "Draining open connections");
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        warn!("Shutdown timeout elapsed with connections still open, exiting");
        std::process::exit(0);
    });
}
