//! Session Middleware
//!
//! Resolves the session cookie once per request and stores the resulting
//! [`SessionContext`] in the request extensions. Handlers read it with
//! `Extension<SessionContext>`.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::application::session_gate::SessionContext;
use crate::domain::repository::AuthStore;
use crate::presentation::handlers::AuthAppState;

/// Middleware that resolves the session but never rejects
pub async fn resolve_session<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: AuthStore,
{
    let token = platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);

    let ctx: SessionContext = state.gate().resolve(token.as_deref()).await;

    req.extensions_mut().insert(ctx);

    next.run(req).await
}
