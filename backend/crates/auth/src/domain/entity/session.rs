//! Session Entity
//!
//! Server-side session referenced by a signed cookie token.
//! Anonymous sessions exist only to carry a flash notice.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::value_object::AccountId;

/// CSRF token entropy in bytes (hex-encoded to 32 characters)
pub const CSRF_TOKEN_BYTES: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    /// Bound account, `None` for anonymous sessions
    pub account_id: Option<AccountId>,
    /// Per-session CSRF token, issued on login/registration
    pub csrf_token: Option<String>,
    /// One-shot flash notice
    pub notice: Option<String>,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Fresh session bound to an account, with a new CSRF token
    pub fn authenticated(account_id: AccountId, ttl: Duration) -> Self {
        Self {
            csrf_token: Some(platform::crypto::random_hex(CSRF_TOKEN_BYTES)),
            account_id: Some(account_id),
            ..Self::anonymous(ttl)
        }
    }

    /// Session with no identity
    pub fn anonymous(ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            account_id: None,
            csrf_token: None,
            notice: None,
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_session_has_csrf_token() {
        let session = Session::authenticated(AccountId::new(3), Duration::hours(1));
        let token = session.csrf_token.as_deref().unwrap();
        assert_eq!(token.len(), CSRF_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(session.account_id, Some(AccountId::new(3)));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_sessions_get_distinct_tokens() {
        let a = Session::authenticated(AccountId::new(1), Duration::hours(1));
        let b = Session::authenticated(AccountId::new(1), Duration::hours(1));
        assert_ne!(a.session_id, b.session_id);
        assert_ne!(a.csrf_token, b.csrf_token);
    }

    #[test]
    fn test_anonymous_session() {
        let session = Session::anonymous(Duration::hours(1)).with_notice("hello");
        assert!(session.account_id.is_none());
        assert!(session.csrf_token.is_none());
        assert_eq!(session.notice.as_deref(), Some("hello"));
    }

    #[test]
    fn test_expired_session() {
        let session = Session::anonymous(Duration::milliseconds(-1));
        assert!(session.is_expired());
    }
}
