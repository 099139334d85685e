//! Authenticate Use Case
//!
//! Verifies an account name / password pair and starts a session.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::session_gate::SessionGate;
use crate::domain::entity::Account;
use crate::domain::repository::AuthStore;
use crate::domain::value_object::{AccountName, RawPassword};
use crate::error::{AuthError, AuthResult};

/// Format check shared by registration: `[0-9A-Za-z_]{3,}` / `[0-9A-Za-z_]{6,}`
pub fn validate_credentials_format(account_name: &str, password: &str) -> bool {
    AccountName::new(account_name).is_ok() && RawPassword::new(password).is_ok()
}

/// Login input
pub struct LoginInput {
    pub account_name: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    pub account: Account,
    /// Session token for cookie
    pub session_token: String,
}

/// Authenticate use case
pub struct AuthenticateUseCase<R>
where
    R: AuthStore,
{
    repo: Arc<R>,
    gate: SessionGate<R>,
}

impl<R> AuthenticateUseCase<R>
where
    R: AuthStore,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            gate: SessionGate::new(repo.clone(), config),
            repo,
        }
    }

    /// Look up the non-banned account and verify the password.
    /// Unknown name, banned account and wrong password are indistinguishable.
    pub async fn authenticate(&self, account_name: &str, password: &str) -> AuthResult<Option<Account>> {
        let name = AccountName::from_stored(account_name.to_string());

        let Some(account) = self.repo.find_active_by_name(&name).await? else {
            return Ok(None);
        };

        Ok(account.verify_password(password).then_some(account))
    }

    pub async fn execute(&self, input: LoginInput, previous: Option<Uuid>) -> AuthResult<LoginOutput> {
        let account = self
            .authenticate(&input.account_name, &input.password)
            .await?
            .ok_or_else(|| {
                tracing::warn!(account_name = %input.account_name, "Failed login attempt");
                AuthError::InvalidCredentials
            })?;

        let session_token = self.gate.start(account.id, previous).await?;

        tracing::info!(account_id = %account.id, "Account signed in");

        Ok(LoginOutput {
            account,
            session_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::NewAccount;
    use crate::domain::repository::AccountRepository;
    use crate::infra::memory::InMemoryAuthRepository;

    async fn setup() -> (AuthenticateUseCase<InMemoryAuthRepository>, Arc<InMemoryAuthRepository>) {
        let repo = Arc::new(InMemoryAuthRepository::default());
        let account = NewAccount::new(AccountName::new("mary").unwrap(), "marymary");
        repo.create_account(&account).await.unwrap();
        let use_case = AuthenticateUseCase::new(repo.clone(), Arc::new(AuthConfig::development()));
        (use_case, repo)
    }

    #[test]
    fn test_validate_credentials_format() {
        assert!(validate_credentials_format("mary", "marymary"));
        assert!(validate_credentials_format("abc", "abcdef"));
        assert!(!validate_credentials_format("ab", "abcdef"));
        assert!(!validate_credentials_format("abc", "abcde"));
        assert!(!validate_credentials_format("ab-c", "abcdef"));
        assert!(!validate_credentials_format("abc", "abc def"));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let (use_case, _) = setup().await;
        let account = use_case.authenticate("mary", "marymary").await.unwrap();
        assert_eq!(account.map(|a| a.account_name.into_inner()), Some("mary".to_string()));
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_uniform() {
        let (use_case, repo) = setup().await;

        assert!(use_case.authenticate("mary", "wrongpass").await.unwrap().is_none());
        assert!(use_case.authenticate("nobody", "marymary").await.unwrap().is_none());

        let account = use_case.authenticate("mary", "marymary").await.unwrap().unwrap();
        repo.ban_account(account.id).await.unwrap();
        assert!(use_case.authenticate("mary", "marymary").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_execute_issues_session() {
        let (use_case, _) = setup().await;
        let output = use_case
            .execute(
                LoginInput {
                    account_name: "mary".into(),
                    password: "marymary".into(),
                },
                None,
            )
            .await
            .unwrap();

        assert!(output.session_token.contains('.'));
    }

    #[tokio::test]
    async fn test_execute_wrong_password() {
        let (use_case, _) = setup().await;
        let result = use_case
            .execute(
                LoginInput {
                    account_name: "mary".into(),
                    password: "nope_nope".into(),
                },
                None,
            )
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}
