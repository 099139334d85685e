//! API DTOs (Data Transfer Objects)
//!
//! Pages are served as JSON views; forms are URL-encoded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::Account;
use crate::domain::value_object::Authority;

// ============================================================================
// Forms
// ============================================================================

/// Login / registration form
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub password: String,
}

/// Ban form (`uid[]` repeated once per target)
#[derive(Debug, Clone, Deserialize)]
pub struct BanForm {
    #[serde(rename = "uid[]", default)]
    pub uids: Vec<String>,
    #[serde(default)]
    pub csrf_token: String,
}

// ============================================================================
// Views
// ============================================================================

/// Public view of an account (no pass-hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: i64,
    pub account_name: String,
    pub authority: Authority,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.get(),
            account_name: account.account_name.as_str().to_string(),
            authority: account.authority,
            created_at: account.created_at,
        }
    }
}

/// Login / registration page
#[derive(Debug, Clone, Serialize)]
pub struct AuthPageView {
    pub me: Option<AccountView>,
    pub flash: Option<String>,
}

/// Moderation page
#[derive(Debug, Clone, Serialize)]
pub struct BannedPageView {
    pub me: AccountView,
    pub accounts: Vec<AccountView>,
    pub csrf_token: String,
}
