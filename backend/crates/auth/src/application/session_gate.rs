//! Session Gate
//!
//! Resolves the session cookie into a [`SessionContext`], rotates sessions
//! on login, and manages the one-shot flash notice.
//!
//! Cookie token format: `{session_uuid}.{base64url(hmac_sha256(secret, session_uuid))}`

use std::sync::Arc;

use platform::crypto::{constant_time_eq, from_base64_url, hmac_sha256, to_base64_url};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::{Account, Session};
use crate::domain::repository::AuthStore;
use crate::domain::value_object::AccountId;
use crate::error::{AuthError, AuthResult};

/// Per-request identity, stored in request extensions by the session middleware
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Live session row, if the cookie resolved to one
    pub session_id: Option<Uuid>,
    /// Logged-in, non-banned account
    pub me: Option<Account>,
    /// Session CSRF token, empty when none was issued
    pub csrf_token: String,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_logged_in(&self) -> bool {
        self.me.is_some()
    }

    pub fn me(&self) -> Option<&Account> {
        self.me.as_ref()
    }

    /// The logged-in account or [`AuthError::LoginRequired`]
    pub fn require_login(&self) -> AuthResult<&Account> {
        self.me.as_ref().ok_or(AuthError::LoginRequired)
    }

    /// Compare a submitted CSRF token against the session's token
    pub fn check_csrf(&self, submitted: &str) -> AuthResult<()> {
        if constant_time_eq(self.csrf_token.as_bytes(), submitted.as_bytes()) {
            Ok(())
        } else {
            Err(AuthError::CsrfMismatch)
        }
    }
}

/// Session gate over any auth store
pub struct SessionGate<R>
where
    R: AuthStore,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> Clone for SessionGate<R>
where
    R: AuthStore,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R> SessionGate<R>
where
    R: AuthStore,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Resolve a cookie token. Every failure degrades to anonymous.
    pub async fn resolve(&self, token: Option<&str>) -> SessionContext {
        let Some(session_id) = token.and_then(|t| self.verify_token(t)) else {
            return SessionContext::anonymous();
        };

        let session = match self.repo.find_session(session_id).await {
            Ok(Some(session)) if !session.is_expired() => session,
            Ok(_) => return SessionContext::anonymous(),
            Err(e) => {
                tracing::error!(error = %e, "Session lookup failed");
                return SessionContext::anonymous();
            }
        };

        let me = match session.account_id {
            Some(account_id) => self.load_active_account(account_id).await,
            None => None,
        };

        SessionContext {
            session_id: Some(session.session_id),
            me,
            csrf_token: session.csrf_token.unwrap_or_default(),
        }
    }

    async fn load_active_account(&self, account_id: AccountId) -> Option<Account> {
        match self.repo.find_account(account_id).await {
            Ok(Some(account)) if !account.is_banned() => Some(account),
            Ok(_) => None,
            Err(e) => {
                tracing::error!(error = %e, account_id = %account_id, "Session account lookup failed");
                None
            }
        }
    }

    /// Bind a fresh session (and CSRF token) to `account_id`, dropping the
    /// previous session. Returns the cookie token.
    pub async fn start(&self, account_id: AccountId, previous: Option<Uuid>) -> AuthResult<String> {
        let session = Session::authenticated(account_id, self.config.session_ttl_chrono());
        self.repo.create_session(&session).await?;

        if let Some(previous) = previous {
            if let Err(e) = self.repo.delete_session(previous).await {
                tracing::warn!(error = %e, "Failed to delete previous session");
            }
        }

        tracing::info!(
            account_id = %account_id,
            session_id = %session.session_id,
            "Session started"
        );

        Ok(self.issue_token(session.session_id))
    }

    /// Delete the current session row, if any
    pub async fn end(&self, ctx: &SessionContext) -> AuthResult<()> {
        if let Some(session_id) = ctx.session_id {
            self.repo.delete_session(session_id).await?;
        }
        Ok(())
    }

    /// One-shot read of the pending notice
    pub async fn take_flash(&self, ctx: &SessionContext) -> Option<String> {
        let session_id = ctx.session_id?;
        match self.repo.take_notice(session_id).await {
            Ok(notice) => notice,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read flash notice");
                None
            }
        }
    }

    /// Store a notice. Creates an anonymous session when there is none and
    /// returns the new cookie token in that case.
    pub async fn set_flash(&self, ctx: &SessionContext, notice: &str) -> AuthResult<Option<String>> {
        if let Some(session_id) = ctx.session_id {
            self.repo.set_notice(session_id, notice).await?;
            return Ok(None);
        }

        let session = Session::anonymous(self.config.session_ttl_chrono()).with_notice(notice);
        self.repo.create_session(&session).await?;
        Ok(Some(self.issue_token(session.session_id)))
    }

    /// Sign a session id into a cookie token
    pub fn issue_token(&self, session_id: Uuid) -> String {
        let id = session_id.to_string();
        let signature = hmac_sha256(&self.config.session_secret, id.as_bytes());
        format!("{}.{}", id, to_base64_url(&signature))
    }

    /// Verify a cookie token and extract the session id
    pub fn verify_token(&self, token: &str) -> Option<Uuid> {
        let (id, signature_b64) = token.split_once('.')?;
        let signature = from_base64_url(signature_b64).ok()?;
        let expected = hmac_sha256(&self.config.session_secret, id.as_bytes());

        if !constant_time_eq(&expected, &signature) {
            return None;
        }

        id.parse().ok()
    }

    /// `Set-Cookie` value carrying `token`
    pub fn session_cookie(&self, token: &str) -> String {
        self.config.cookie().build_set_cookie(token)
    }

    /// `Set-Cookie` value expiring the session cookie
    pub fn clear_cookie(&self) -> String {
        self.config.cookie().build_delete_cookie()
    }
}
