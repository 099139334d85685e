//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use uuid::Uuid;

use crate::domain::entity::{Account, NewAccount, Session};
use crate::domain::value_object::{AccountId, AccountName};
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new ordinary account, returning its id
    async fn create_account(&self, account: &NewAccount) -> AuthResult<AccountId>;

    /// Find account by ID, banned or not
    async fn find_account(&self, account_id: AccountId) -> AuthResult<Option<Account>>;

    /// Find a non-banned account by name
    async fn find_active_by_name(&self, account_name: &AccountName) -> AuthResult<Option<Account>>;

    /// Check if an account name is registered (banned accounts included)
    async fn exists_by_name(&self, account_name: &AccountName) -> AuthResult<bool>;

    /// Non-banned ordinary accounts, newest first
    async fn list_active_ordinary(&self) -> AuthResult<Vec<Account>>;

    /// Set `del_flg`. Returns whether a row was updated.
    async fn ban_account(&self, account_id: AccountId) -> AuthResult<bool>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create_session(&self, session: &Session) -> AuthResult<()>;

    /// Find session by ID
    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<Session>>;

    /// Delete a session
    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()>;

    /// Store a flash notice, overwriting any pending one
    async fn set_notice(&self, session_id: Uuid, notice: &str) -> AuthResult<()>;

    /// Read and clear the pending notice in one step
    async fn take_notice(&self, session_id: Uuid) -> AuthResult<Option<String>>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Everything the auth layer persists, behind one handle
pub trait AuthStore: AccountRepository + SessionRepository + Clone + Send + Sync + 'static {}

impl<T> AuthStore for T where T: AccountRepository + SessionRepository + Clone + Send + Sync + 'static {}
