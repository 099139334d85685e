//! Moderation Use Case
//!
//! Lists ban candidates and soft-bans accounts. Only accounts with
//! moderator authority may use it.

use std::str::FromStr;
use std::sync::Arc;

use crate::application::session_gate::SessionContext;
use crate::domain::entity::Account;
use crate::domain::repository::AuthStore;
use crate::domain::value_object::AccountId;
use crate::error::{AuthError, AuthResult};

/// Result of a ban request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BanOutcome {
    pub banned: usize,
    pub skipped: usize,
}

/// Moderation use case
pub struct ModerationUseCase<R>
where
    R: AuthStore,
{
    repo: Arc<R>,
}

impl<R> ModerationUseCase<R>
where
    R: AuthStore,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Login gate, then authority gate
    pub fn authorize(ctx: &SessionContext) -> AuthResult<&Account> {
        let me = ctx.require_login()?;
        if !me.is_moderator() {
            return Err(AuthError::Forbidden);
        }
        Ok(me)
    }

    /// Non-banned ordinary accounts, newest first
    pub async fn list_candidates(&self, ctx: &SessionContext) -> AuthResult<Vec<Account>> {
        Self::authorize(ctx)?;
        self.repo.list_active_ordinary().await
    }

    /// Ban every submitted id independently. Unparseable ids and per-id
    /// failures are logged and skipped.
    pub async fn ban(&self, ctx: &SessionContext, csrf_token: &str, ids: &[String]) -> AuthResult<BanOutcome> {
        let me = Self::authorize(ctx)?;
        ctx.check_csrf(csrf_token)?;

        let mut outcome = BanOutcome::default();

        for raw in ids {
            let account_id = match AccountId::from_str(raw) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(uid = %raw, error = %e, "Skipping invalid ban target");
                    outcome.skipped += 1;
                    continue;
                }
            };

            match self.repo.ban_account(account_id).await {
                Ok(true) => {
                    tracing::info!(moderator_id = %me.id, account_id = %account_id, "Account banned");
                    outcome.banned += 1;
                }
                Ok(false) => {
                    tracing::warn!(account_id = %account_id, "Ban target not found");
                    outcome.skipped += 1;
                }
                Err(e) => {
                    tracing::error!(account_id = %account_id, error = %e, "Failed to ban account");
                    outcome.skipped += 1;
                }
            }
        }

        Ok(outcome)
    }
}
