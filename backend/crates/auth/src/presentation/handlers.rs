//! HTTP Handlers

use axum::extract::{Extension, Form, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    AuthenticateUseCase, LoginInput, ModerationUseCase, RegisterInput, RegisterUseCase,
    SessionContext, SessionGate,
};
use crate::domain::repository::AuthStore;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{AccountView, AuthPageView, BanForm, BannedPageView, CredentialsForm};
use crate::presentation::response::{flash_redirect, found, found_with_cookie};

pub const LOGIN_FAILED_NOTICE: &str = "Account name or password is incorrect";
pub const REGISTER_FORMAT_NOTICE: &str =
    "Account name must be at least 3 characters and password at least 6; letters, digits and underscore only";
pub const ACCOUNT_NAME_TAKEN_NOTICE: &str = "Account name is already in use";

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AuthStore,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthAppState<R>
where
    R: AuthStore,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
        }
    }

    pub fn gate(&self) -> SessionGate<R> {
        SessionGate::new(self.repo.clone(), self.config.clone())
    }
}

// ============================================================================
// Login
// ============================================================================

/// GET /login
pub async fn login_page<R>(
    State(state): State<AuthAppState<R>>,
    Extension(ctx): Extension<SessionContext>,
) -> Response
where
    R: AuthStore,
{
    auth_page(&state, &ctx).await
}

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<CredentialsForm>,
) -> AuthResult<Response>
where
    R: AuthStore,
{
    if ctx.is_logged_in() {
        return Ok(found("/"));
    }

    let gate = state.gate();
    let use_case = AuthenticateUseCase::new(state.repo.clone(), state.config.clone());

    let input = LoginInput {
        account_name: form.account_name,
        password: form.password,
    };

    match use_case.execute(input, ctx.session_id).await {
        Ok(output) => Ok(found_with_cookie(
            "/",
            Some(gate.session_cookie(&output.session_token)),
        )),
        Err(AuthError::InvalidCredentials) => {
            flash_redirect(&gate, &ctx, LOGIN_FAILED_NOTICE, "/login").await
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Register
// ============================================================================

/// GET /register
pub async fn register_page<R>(
    State(state): State<AuthAppState<R>>,
    Extension(ctx): Extension<SessionContext>,
) -> Response
where
    R: AuthStore,
{
    auth_page(&state, &ctx).await
}

/// POST /register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<CredentialsForm>,
) -> AuthResult<Response>
where
    R: AuthStore,
{
    if ctx.is_logged_in() {
        return Ok(found("/"));
    }

    let gate = state.gate();
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        account_name: form.account_name,
        password: form.password,
    };

    match use_case.execute(input, ctx.session_id).await {
        Ok(output) => Ok(found_with_cookie(
            "/",
            Some(gate.session_cookie(&output.session_token)),
        )),
        Err(AuthError::InvalidFormat) => {
            flash_redirect(&gate, &ctx, REGISTER_FORMAT_NOTICE, "/register").await
        }
        Err(AuthError::AccountNameTaken) => {
            flash_redirect(&gate, &ctx, ACCOUNT_NAME_TAKEN_NOTICE, "/register").await
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Logout
// ============================================================================

/// GET /logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    Extension(ctx): Extension<SessionContext>,
) -> Response
where
    R: AuthStore,
{
    let gate = state.gate();

    // The cookie is cleared regardless
    if let Err(e) = gate.end(&ctx).await {
        tracing::warn!(error = %e, "Failed to delete session on logout");
    }

    found_with_cookie("/", Some(gate.clear_cookie()))
}

// ============================================================================
// Moderation
// ============================================================================

/// GET /admin/banned
pub async fn banned_page<R>(
    State(state): State<AuthAppState<R>>,
    Extension(ctx): Extension<SessionContext>,
) -> AuthResult<Response>
where
    R: AuthStore,
{
    let use_case = ModerationUseCase::new(state.repo.clone());

    let accounts = match use_case.list_candidates(&ctx).await {
        Ok(accounts) => accounts,
        Err(AuthError::LoginRequired) => return Ok(found("/")),
        Err(e) => return Err(e),
    };

    let me = ctx.require_login()?;

    Ok(Json(BannedPageView {
        me: AccountView::from(me),
        accounts: accounts.iter().map(AccountView::from).collect(),
        csrf_token: ctx.csrf_token.clone(),
    })
    .into_response())
}

/// POST /admin/banned
pub async fn ban<R>(
    State(state): State<AuthAppState<R>>,
    Extension(ctx): Extension<SessionContext>,
    axum_extra::extract::Form(form): axum_extra::extract::Form<BanForm>,
) -> AuthResult<Response>
where
    R: AuthStore,
{
    let use_case = ModerationUseCase::new(state.repo.clone());

    match use_case.ban(&ctx, &form.csrf_token, &form.uids).await {
        Ok(_) => Ok(found("/admin/banned")),
        Err(AuthError::LoginRequired) => Ok(found("/")),
        Err(e) => Err(e),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Shared body of the login and registration pages
async fn auth_page<R>(state: &AuthAppState<R>, ctx: &SessionContext) -> Response
where
    R: AuthStore,
{
    if ctx.is_logged_in() {
        return found("/");
    }

    let flash = state.gate().take_flash(ctx).await;

    Json(AuthPageView {
        me: ctx.me().map(AccountView::from),
        flash,
    })
    .into_response()
}
