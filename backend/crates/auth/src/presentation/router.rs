//! Auth Router

use axum::{Router, middleware, routing::get};

use crate::application::config::AuthConfig;
use crate::domain::repository::AuthStore;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::resolve_session;

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: AuthStore,
{
    let state = AuthAppState::new(repo, config);

    Router::new()
        .route(
            "/login",
            get(handlers::login_page::<R>).post(handlers::login::<R>),
        )
        .route(
            "/register",
            get(handlers::register_page::<R>).post(handlers::register::<R>),
        )
        .route("/logout", get(handlers::logout::<R>))
        .route(
            "/admin/banned",
            get(handlers::banned_page::<R>).post(handlers::ban::<R>),
        )
        .with_state(state)
}

/// Resolve the session for every route of `router`. Apply after all
/// routers are merged.
pub fn with_session_context<R>(router: Router, state: AuthAppState<R>) -> Router
where
    R: AuthStore,
{
    router.layer(middleware::from_fn_with_state(state, resolve_session::<R>))
}
