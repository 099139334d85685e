//! Account Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{AccountId, AccountName, Authority};

/// Registered account. Never hard-deleted; bans set `del_flg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub account_name: AccountName,
    /// `digest(password + ":" + digest(account_name))`
    pub passhash: String,
    pub authority: Authority,
    /// Soft-ban flag
    pub del_flg: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    #[inline]
    pub fn is_banned(&self) -> bool {
        self.del_flg
    }

    #[inline]
    pub fn is_moderator(&self) -> bool {
        self.authority.is_moderator()
    }

    /// Check a candidate password against the stored pass-hash
    pub fn verify_password(&self, password: &str) -> bool {
        platform::password::verify_passhash(self.account_name.as_str(), password, &self.passhash)
    }
}

/// Values needed to insert a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub account_name: AccountName,
    pub passhash: String,
}

impl NewAccount {
    pub fn new(account_name: AccountName, password: &str) -> Self {
        let passhash = platform::password::calculate_passhash(account_name.as_str(), password);
        Self {
            account_name,
            passhash,
        }
    }
}
