//! In-Memory Repository
//!
//! Backs use-case and router tests without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entity::{Account, NewAccount, Session};
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::{AccountId, AccountName, Authority};
use crate::error::AuthResult;

#[derive(Default)]
struct State {
    accounts: Vec<Account>,
    sessions: HashMap<Uuid, Session>,
}

/// In-memory auth repository
#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    state: Arc<Mutex<State>>,
}

impl InMemoryAuthRepository {
    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Promote or demote an account
    pub fn set_authority(&self, account_id: AccountId, authority: Authority) {
        self.with_state(|state| {
            if let Some(account) = state.accounts.iter_mut().find(|a| a.id == account_id) {
                account.authority = authority;
            }
        });
    }

    pub fn session_count(&self) -> usize {
        self.with_state(|state| state.sessions.len())
    }
}

impl AccountRepository for InMemoryAuthRepository {
    async fn create_account(&self, account: &NewAccount) -> AuthResult<AccountId> {
        Ok(self.with_state(|state| {
            let id = AccountId::new(state.accounts.len() as i64 + 1);
            state.accounts.push(Account {
                id,
                account_name: account.account_name.clone(),
                passhash: account.passhash.clone(),
                authority: Authority::Ordinary,
                del_flg: false,
                // Strictly increasing so "newest first" is deterministic
                created_at: Utc::now() + chrono::Duration::milliseconds(id.get()),
            });
            id
        }))
    }

    async fn find_account(&self, account_id: AccountId) -> AuthResult<Option<Account>> {
        Ok(self.with_state(|state| state.accounts.iter().find(|a| a.id == account_id).cloned()))
    }

    async fn find_active_by_name(&self, account_name: &AccountName) -> AuthResult<Option<Account>> {
        Ok(self.with_state(|state| {
            state
                .accounts
                .iter()
                .find(|a| &a.account_name == account_name && !a.del_flg)
                .cloned()
        }))
    }

    async fn exists_by_name(&self, account_name: &AccountName) -> AuthResult<bool> {
        Ok(self.with_state(|state| state.accounts.iter().any(|a| &a.account_name == account_name)))
    }

    async fn list_active_ordinary(&self) -> AuthResult<Vec<Account>> {
        Ok(self.with_state(|state| {
            let mut accounts: Vec<Account> = state
                .accounts
                .iter()
                .filter(|a| !a.del_flg && !a.is_moderator())
                .cloned()
                .collect();
            accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            accounts
        }))
    }

    async fn ban_account(&self, account_id: AccountId) -> AuthResult<bool> {
        Ok(self.with_state(|state| {
            match state.accounts.iter_mut().find(|a| a.id == account_id) {
                Some(account) => {
                    account.del_flg = true;
                    true
                }
                None => false,
            }
        }))
    }
}

impl SessionRepository for InMemoryAuthRepository {
    async fn create_session(&self, session: &Session) -> AuthResult<()> {
        self.with_state(|state| state.sessions.insert(session.session_id, session.clone()));
        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> AuthResult<Option<Session>> {
        Ok(self.with_state(|state| state.sessions.get(&session_id).cloned()))
    }

    async fn delete_session(&self, session_id: Uuid) -> AuthResult<()> {
        self.with_state(|state| state.sessions.remove(&session_id));
        Ok(())
    }

    async fn set_notice(&self, session_id: Uuid, notice: &str) -> AuthResult<()> {
        self.with_state(|state| {
            if let Some(session) = state.sessions.get_mut(&session_id) {
                session.notice = Some(notice.to_string());
            }
        });
        Ok(())
    }

    async fn take_notice(&self, session_id: Uuid) -> AuthResult<Option<String>> {
        Ok(self.with_state(|state| {
            state
                .sessions
                .get_mut(&session_id)
                .and_then(|session| session.notice.take())
        }))
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        Ok(self.with_state(|state| {
            let before = state.sessions.len();
            state.sessions.retain(|_, session| !session.is_expired());
            (before - state.sessions.len()) as u64
        }))
    }
}
