//! BrandyBot Service - HTTP API for logos, brands and mockups
//!
//! This is the main entry point for the brandybot service.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brandybot_service::rate_limit::RateLimits;
use brandybot_service::{create_router, AppState, ServiceConfig};
use brandybot_store::{MemoryStore, PgStore, Store};

/// How often idle rate-limit buckets are dropped.
const LIMITER_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,brandybot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting BrandyBot Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();
    config.validate()?;

    tracing::info!(
        environment = ?config.environment,
        listen_addr = %config.listen_addr,
        database_configured = %config.database_url.is_some(),
        firebase_project = ?config.firebase.project_id,
        ai_service_url = %config.ai_service_url,
        "Service configuration loaded"
    );

    let store = open_store(&config).await?;

    // Build app state
    let state = AppState::new(store, config.clone())?;
    tracing::info!(
        llm = state.has_llm(),
        image_host = state.has_imgbb(),
        "Integrations configured"
    );
    spawn_limiter_purge(state.limits.clone(), config.rate_limit.window_ms);

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// PostgreSQL when a database URL is configured, otherwise in-memory.
async fn open_store(config: &ServiceConfig) -> Result<Arc<dyn Store>, Box<dyn std::error::Error>> {
    let Some(url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set - using in-memory store, data is lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let store = PgStore::connect_lazy(url, config.database_max_connections)?;
    store.migrate().await?;
    tracing::info!("Database migrations applied");

    if config.migrate_legacy {
        import_legacy(config, &store).await?;
    }

    Ok(Arc::new(store))
}

#[cfg(feature = "rocksdb-backend")]
async fn import_legacy(
    config: &ServiceConfig,
    target: &PgStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(dir) = &config.legacy_data_dir else {
        tracing::warn!("MIGRATE_LEGACY set without LEGACY_DATA_DIR - skipping import");
        return Ok(());
    };

    tracing::info!(path = %dir, "Importing legacy RocksDB data");
    let source = brandybot_store::RocksStore::open(dir)?;
    let report = brandybot_store::migrate_legacy(&source, target).await?;
    tracing::info!(
        users = report.users,
        brands = report.brands,
        logos = report.logos,
        skipped = report.skipped,
        conflicts = report.conflicts,
        "Legacy import finished"
    );
    Ok(())
}

#[cfg(not(feature = "rocksdb-backend"))]
async fn import_legacy(
    _config: &ServiceConfig,
    _target: &PgStore,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::warn!("MIGRATE_LEGACY set but built without the rocksdb-backend feature - skipping import");
    Ok(())
}

/// Periodically drop rate-limit buckets idle for a full window.
fn spawn_limiter_purge(limits: RateLimits, window_ms: u64) {
    let max_idle = Duration::from_millis(window_ms);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LIMITER_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            limits.api.purge_stale(max_idle).await;
            limits.auth.purge_stale(max_idle).await;
        }
    });
}
