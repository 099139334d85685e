//! Feed Router

use auth::{AuthStore, PgAuthRepository, SessionGate};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use platform::cache::AnyObjectCache;

use crate::application::config::FeedConfig;
use crate::domain::repository::FeedStore;
use crate::infra::postgres::PgFeedRepository;
use crate::presentation::handlers::{self, FeedAppState};

/// Create the Feed router with PostgreSQL repositories
pub fn feed_router(
    repo: PgFeedRepository,
    sessions: SessionGate<PgAuthRepository>,
    cache: AnyObjectCache,
    config: FeedConfig,
) -> Router {
    feed_router_generic(repo, sessions, cache, config)
}

/// Create a generic Feed router for any repository implementation.
/// Handlers expect a `SessionContext` extension (see `auth::with_session_context`).
pub fn feed_router_generic<F, R>(
    repo: F,
    sessions: SessionGate<R>,
    cache: AnyObjectCache,
    config: FeedConfig,
) -> Router
where
    F: FeedStore,
    R: AuthStore,
{
    let body_limit = config.request_body_limit_bytes;
    let state = FeedAppState::new(repo, sessions, cache, config);

    Router::new()
        .route(
            "/",
            get(handlers::index::<F, R>)
                .post(handlers::create_post::<F, R>)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/posts", get(handlers::posts::<F, R>))
        .route("/posts/{id}", get(handlers::post_detail::<F, R>))
        .route("/comment", post(handlers::create_comment::<F, R>))
        .route("/image/{file}", get(handlers::image::<F, R>))
        .route("/{handle}", get(handlers::account_or_static::<F, R>))
        .with_state(state)
}
