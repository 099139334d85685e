//! Raw Password Value Object
//!
//! Plain-text password as submitted by the client. Only the derived
//! pass-hash is ever stored.

use std::fmt;

use super::account_name::is_credential_char;

/// Minimum length for passwords
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Password validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("Password must be at least {PASSWORD_MIN_LENGTH} characters")]
    TooShort,
    #[error("Password may only contain letters, digits and underscore")]
    InvalidCharacter,
}

/// Raw password (never logged)
#[derive(Clone)]
pub struct RawPassword(String);

impl RawPassword {
    pub fn new(input: &str) -> Result<Self, PasswordError> {
        if !input.chars().all(is_credential_char) {
            return Err(PasswordError::InvalidCharacter);
        }
        if input.len() < PASSWORD_MIN_LENGTH {
            return Err(PasswordError::TooShort);
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        assert!(RawPassword::new("abcdef").is_ok());
        assert!(RawPassword::new("pass_word_123").is_ok());
        assert_eq!(RawPassword::new("abcde").unwrap_err(), PasswordError::TooShort);
        assert_eq!(
            RawPassword::new("abc def").unwrap_err(),
            PasswordError::InvalidCharacter
        );
        assert_eq!(
            RawPassword::new("p@ssword").unwrap_err(),
            PasswordError::InvalidCharacter
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let pw = RawPassword::new("supersecret").unwrap();
        assert!(!format!("{pw:?}").contains("supersecret"));
    }
}
