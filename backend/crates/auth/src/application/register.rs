//! Register Use Case
//!
//! Creates an ordinary account and logs it in.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::session_gate::SessionGate;
use crate::domain::entity::{Account, NewAccount};
use crate::domain::repository::AuthStore;
use crate::domain::value_object::{AccountName, Authority, RawPassword};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub account_name: String,
    pub password: String,
}

/// Register output
pub struct RegisterOutput {
    pub account: Account,
    /// Session token for cookie
    pub session_token: String,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: AuthStore,
{
    repo: Arc<R>,
    gate: SessionGate<R>,
}

impl<R> RegisterUseCase<R>
where
    R: AuthStore,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            gate: SessionGate::new(repo.clone(), config),
            repo,
        }
    }

    pub async fn execute(&self, input: RegisterInput, previous: Option<Uuid>) -> AuthResult<RegisterOutput> {
        let account_name =
            AccountName::new(&input.account_name).map_err(|_| AuthError::InvalidFormat)?;
        let password = RawPassword::new(&input.password).map_err(|_| AuthError::InvalidFormat)?;

        if self.repo.exists_by_name(&account_name).await? {
            return Err(AuthError::AccountNameTaken);
        }

        let new_account = NewAccount::new(account_name, password.as_str());

        // A concurrent registration can still win the unique index
        let account_id = self
            .repo
            .create_account(&new_account)
            .await
            .map_err(|e| match e {
                AuthError::Database(ref db)
                    if db
                        .as_database_error()
                        .is_some_and(|d| d.is_unique_violation()) =>
                {
                    AuthError::AccountNameTaken
                }
                other => other,
            })?;

        let session_token = self.gate.start(account_id, previous).await?;

        tracing::info!(
            account_id = %account_id,
            account_name = %new_account.account_name,
            "Account registered"
        );

        Ok(RegisterOutput {
            account: Account {
                id: account_id,
                account_name: new_account.account_name,
                passhash: new_account.passhash,
                authority: Authority::Ordinary,
                del_flg: false,
                created_at: chrono::Utc::now(),
            },
            session_token,
        })
    }
}
