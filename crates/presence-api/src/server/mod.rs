//! Server setup and initialization
//!
//! Provides the application builder, dependency wiring and the server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use presence_cache::{RedisPool, RedisViewerRepository};
use presence_common::{AppConfig, AppError, JwtIdentityResolver, JwtService, ViewerStoreKind};
use presence_core::traits::ViewerRepository;
use presence_core::SnowflakeGenerator;
use presence_db::{
    create_pool, run_migrations, PgAuditLogRepository, PgUserRepository, PgViewerRepository,
};
use presence_service::{ServiceContext, ViewerReaper};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health routes sit outside the rate limiter.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    api.merge(health_routes()).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = presence_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool, &config.database.migrations_dir)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    // Select the viewer store
    let mut redis_pool = None;
    let viewer_repo: Arc<dyn ViewerRepository> = match config.presence.store {
        ViewerStoreKind::Postgres => Arc::new(PgViewerRepository::new(pool.clone())),
        ViewerStoreKind::Redis => {
            let redis_config = config.redis.as_ref().ok_or_else(|| {
                AppError::Config("REDIS_URL is required for the redis viewer store".to_string())
            })?;
            let redis = RedisPool::from_config(redis_config)
                .map_err(|e| AppError::Cache(e.to_string()))?;
            redis_pool = Some(Arc::new(redis.clone()));
            Arc::new(RedisViewerRepository::new(redis))
        }
    };
    info!(store = ?config.presence.store, "Viewer store selected");

    // Identity provider
    let identity = Arc::new(JwtIdentityResolver::new(JwtService::from_config(&config.auth)));

    // Build service context
    let service_context = ServiceContext::builder()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .viewer_repo(viewer_repo)
        .audit_log_repo(Arc::new(PgAuditLogRepository::new(pool.clone())))
        .identity(identity)
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .windows(config.presence.windows)
        .reap_batch_size(config.presence.reap_batch_size)
        .super_admin_email(config.auth.super_admin_email.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(
        Arc::new(service_context),
        config,
        pool,
        redis_pool,
    ))
}

/// Run the HTTP server until `shutdown` resolves
pub async fn run_server(
    app: Router,
    addr: SocketAddr,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
///
/// Starts the viewer reaper alongside the HTTP server and stops both on
/// Ctrl-C or SIGTERM.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;
    let reap_interval = config.presence.reap_interval;

    let state = create_app_state(config).await?;

    let reaper = ViewerReaper::new(state.shared_context(), reap_interval)
        .map_err(|e| AppError::Config(e.to_string()))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reaper = reaper.spawn(shutdown_rx);

    let app = create_app(state);
    let result = run_server(app, addr, shutdown_signal()).await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = reaper.await {
        warn!(error = %e, "Viewer reaper task ended abnormally");
    }

    result
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
