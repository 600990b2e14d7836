//! Cottage rental reservation service
//!
//! Reads configuration from TOML (~/.config/cottage-rental/config.toml or
//! `COTTAGE_CONFIG`) and serves the REST API until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cottage_rental::config::LoggingConfig;
use cottage_rental::domain::RepositoryProvider;
use cottage_rental::shared::{listen_for_shutdown_signals, ShutdownSignal, SystemClock};
use cottage_rental::{
    config_path, create_api_router, init_database, run_migrations, AppConfig, AppServices,
    JwtIdentityVerifier, SeaOrmRepositoryProvider,
};

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Configuration and logging ──────────────────────────────
    let path = config_path();
    let loaded = AppConfig::load(&path);
    let app_cfg = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    }
    .with_env_overrides();

    init_tracing(&app_cfg.logging);
    match loaded {
        Ok(_) => info!("Configuration loaded from {}", path.display()),
        Err(e) => error!("Failed to load config {}: {}. Using defaults.", path.display(), e),
    }

    info!("Starting cottage rental reservation service...");

    // Must be installed before the first metrics call.
    let prometheus_handle = PrometheusBuilder::new().install_recorder()?;

    // ── Database ───────────────────────────────────────────────
    let db = init_database(&app_cfg.database_config()).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        e
    })?;
    run_migrations(&db).await.map_err(|e| {
        error!("Failed to run migrations: {}", e);
        e
    })?;

    // ── Services and router ────────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let services = AppServices::new(repos, app_cfg.booking.policy(), Arc::new(SystemClock));
    let jwt_config = app_cfg.jwt_config();
    if jwt_config.uses_default_secret() {
        warn!("JWT secret is the built-in default; set security.jwt_secret or JWT_SECRET");
    }
    let verifier = Arc::new(JwtIdentityVerifier::new(jwt_config));
    let router = create_api_router(services, db.clone(), verifier, Some(prometheus_handle));

    let policy = app_cfg.booking.policy();
    info!(
        "Stays run {:02}:00 to {:02}:00 UTC, cancellation closes {}h before check-in",
        policy.check_in_hour,
        policy.check_out_hour,
        policy.cancellation_window.num_hours()
    );

    // ── Serve until a shutdown signal ──────────────────────────
    let shutdown = ShutdownSignal::new();
    tokio::spawn(listen_for_shutdown_signals(shutdown.clone()));

    let addr = app_cfg.api_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    let server_shutdown = shutdown.clone();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        server_shutdown.wait().await;
        info!("REST API received shutdown signal");
    });

    // A server that stops on its own also ends the process.
    let server_task = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let result = server.await;
            shutdown.trigger();
            result
        })
    };

    let timeout = Duration::from_secs(app_cfg.server.shutdown_timeout_secs);
    let drained = shutdown
        .drain(timeout, || async move {
            match server_task.await {
                Ok(Ok(())) => info!("REST API stopped"),
                Ok(Err(e)) => error!("REST API error: {}", e),
                Err(e) => error!("REST API task panicked: {}", e),
            }
        })
        .await;
    if !drained {
        warn!("In-flight requests were abandoned");
    }

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Shutdown complete");
    Ok(())
}
