//! DevLink Server — Developer Community Platform
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use devlink_core::config::AppConfig;
use devlink_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("DEVLINK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DevLink v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = devlink_database::DatabasePool::connect(&config.database).await?;
    devlink_database::migration::run_migrations(db.pool()).await?;
    let db_pool = db.into_pool();

    // ── Step 2: Repositories ─────────────────────────────────────
    let notification_repo = Arc::new(
        devlink_database::repositories::notification::NotificationRepository::new(db_pool.clone()),
    );
    let direct_message_repo = Arc::new(
        devlink_database::repositories::direct_message::DirectMessageRepository::new(
            db_pool.clone(),
        ),
    );
    let community_repo = Arc::new(
        devlink_database::repositories::community::CommunityRepository::new(db_pool.clone()),
    );

    // ── Step 3: Auth ─────────────────────────────────────────────
    let jwt_decoder = Arc::new(devlink_auth::JwtDecoder::new(&config.auth));

    // ── Step 4: Services ─────────────────────────────────────────
    let notification_service = Arc::new(devlink_service::NotificationService::new(
        notification_repo.clone(),
    ));
    let direct_message_service = Arc::new(devlink_service::chat::DirectMessageService::new(
        direct_message_repo.clone(),
    ));
    let community_service = Arc::new(devlink_service::community::CommunityService::new(
        community_repo.clone(),
    ));
    tracing::info!("Services initialized");

    // ── Step 5: Realtime engine ──────────────────────────────────
    let realtime = Arc::new(devlink_realtime::RealtimeEngine::new(
        &config.realtime,
        community_service.clone(),
        notification_service.clone(),
    ));
    tracing::info!("Realtime engine initialized");

    // ── Step 6: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 7: Notification retention task ──────────────────────
    let retention_handle = {
        let retention = config.realtime.notifications.clone();
        let service = notification_service.clone();
        let mut cancel = shutdown_rx.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(
                retention.cleanup_interval_minutes * 60,
            ));
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let cutoff = chrono::Utc::now()
                            - chrono::Duration::days(retention.cleanup_after_days as i64);
                        match service.cleanup_older_than(cutoff).await {
                            Ok(deleted) if deleted > 0 => {
                                tracing::info!(deleted, "Cleaned up old notifications");
                            }
                            Ok(_) => {}
                            Err(e) => tracing::warn!(error = %e, "Notification cleanup failed"),
                        }
                    }
                    _ = cancel.changed() => break,
                }
            }
        })
    };

    // ── Step 8: Build and start HTTP server ──────────────────────
    let app_state = devlink_api::AppState {
        config: Arc::new(config.clone()),
        db_pool,
        jwt_decoder,
        notification_service,
        direct_message_service,
        community_service,
        realtime: realtime.clone(),
    };

    let app = devlink_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("DevLink server listening on {}", addr);

    // ── Step 9: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 10: Drain ───────────────────────────────────────────
    realtime.shutdown();
    let _ = tokio::time::timeout(std::time::Duration::from_secs(10), retention_handle).await;

    tracing::info!("DevLink server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
