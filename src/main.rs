//! otc_remit - OTC Remittance Consolidation Service
//!
//! Aggregates pending foreign-exchange settlement obligations into batched
//! interbank remittances, gated by per-currency exposure thresholds. The
//! consolidation pass runs on a fixed schedule; a minimal HTTP surface
//! exposes liveness.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use otc_remit::events::TracingEventSink;
use otc_remit::jobs::SyncScheduler;
use otc_remit::store::{
    PgCurrentGroupStore, PgExposureRuleStore, PgRemittanceLinkStore, PgRemittanceOrderStore,
    PgRemittanceStore,
};
use otc_remit::sync::SyncRemittanceOrdersHandler;
use otc_remit::{db, Config};

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "otc_remit=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the consolidation handler over the Postgres stores
fn build_sync_handler(pool: &PgPool, page_size: u32) -> SyncRemittanceOrdersHandler {
    let sink = Arc::new(TracingEventSink::new());

    SyncRemittanceOrdersHandler::new(
        Arc::new(PgRemittanceOrderStore::new(pool.clone())),
        Arc::new(PgCurrentGroupStore::new(pool.clone())),
        Arc::new(PgExposureRuleStore::new(pool.clone())),
        Arc::new(PgRemittanceStore::new(pool.clone())),
        Arc::new(PgRemittanceLinkStore::new(pool.clone())),
        sink.clone(),
        sink,
    )
    .with_page_size(page_size)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Starting otc_remit service");
    tracing::info!("Connecting to database...");

    // Create database pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    db::verify_connection(&pool).await?;

    // Verify database schema
    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete. Please run migrations.");
        return Err(anyhow::anyhow!("Database schema incomplete"));
    }

    tracing::info!("Database connected successfully");

    // Start the consolidation scheduler
    let handler = Arc::new(build_sync_handler(&pool, config.sync_page_size));
    let scheduler = SyncScheduler::new(handler, config.sync_interval());
    let scheduler_handle = scheduler.start();

    // Liveness surface
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup
    tracing::info!("Server shutting down...");
    scheduler_handle.abort();
    pool.close().await;
    tracing::info!("Database connections closed. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
