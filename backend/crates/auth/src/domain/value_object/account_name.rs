//! Account Name Value Object
//!
//! Public handle used for login and for the `/@{account_name}` page.
//!
//! ## Invariants
//! - ASCII letters, digits and `_` only
//! - At least 3 characters
//! - Immutable once registered (it salts the pass-hash)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum length for account names
pub const ACCOUNT_NAME_MIN_LENGTH: usize = 3;

/// Account name value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountName(String);

/// Account name validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountNameError {
    #[error("Account name must be at least {ACCOUNT_NAME_MIN_LENGTH} characters")]
    TooShort,
    #[error("Account name may only contain letters, digits and underscore")]
    InvalidCharacter,
}

impl AccountName {
    /// Validate and wrap a submitted account name
    pub fn new(input: &str) -> Result<Self, AccountNameError> {
        if !input.chars().all(is_credential_char) {
            return Err(AccountNameError::InvalidCharacter);
        }
        if input.len() < ACCOUNT_NAME_MIN_LENGTH {
            return Err(AccountNameError::TooShort);
        }
        Ok(Self(input.to_string()))
    }

    /// Wrap a name loaded from storage without re-validating it
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// `[0-9A-Za-z_]`
pub(crate) fn is_credential_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
