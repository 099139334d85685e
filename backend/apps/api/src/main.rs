//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::domain::SessionRepository;
use auth::presentation::AuthAppState;
use auth::{PgAuthRepository, SessionGate, auth_router, with_session_context};
use axum::Router;
use feed::{PgFeedRepository, feed_router};
use platform::cache::AnyObjectCache;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,feed=info,platform=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    let auth_repo = PgAuthRepository::new(pool.clone());
    match auth_repo.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }

    // Home feed snapshot cache
    let cache = AnyObjectCache::from_url(config.redis_url.as_deref(), &config.feed.cache_config()).await?;

    let sessions = SessionGate::new(Arc::new(auth_repo.clone()), Arc::new(config.auth.clone()));
    let public_dir = config.feed.public_dir.clone();

    // Build router
    let app = Router::new()
        .merge(auth_router(auth_repo.clone(), config.auth.clone()))
        .merge(feed_router(
            PgFeedRepository::new(pool.clone()),
            sessions,
            cache,
            config.feed.clone(),
        ))
        .fallback_service(ServeDir::new(&public_dir));

    let app = with_session_context(app, AuthAppState::new(auth_repo, config.auth.clone()))
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!(addr = %config.bind_addr, public_dir = %public_dir.display(), "Listening");

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
