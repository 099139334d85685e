//! Password Hashing and Verification
//!
//! Salted SHA-512 pass-hashes compatible with the existing `accounts.passhash`
//! column:
//!
//! ```text
//! salt     = hex(sha512(account_name))
//! passhash = hex(sha512(password + ":" + salt))
//! ```
//!
//! The account name is the salt source, so renaming an account would
//! invalidate its hash. Account names are immutable.

use crate::crypto::{constant_time_eq, sha512_hex};

/// One-way digest of an arbitrary string (SHA-512, lower-case hex)
pub fn digest(src: &str) -> String {
    sha512_hex(src.as_bytes())
}

/// Per-account salt
pub fn calculate_salt(account_name: &str) -> String {
    digest(account_name)
}

/// Stored pass-hash for `(account_name, password)`
pub fn calculate_passhash(account_name: &str, password: &str) -> String {
    digest(&format!("{}:{}", password, calculate_salt(account_name)))
}

/// Compare a candidate password against a stored pass-hash
pub fn verify_passhash(account_name: &str, password: &str, stored: &str) -> bool {
    let computed = calculate_passhash(account_name, password);
    constant_time_eq(computed.as_bytes(), stored.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_sha512_hex() {
        let d = digest("abc");
        assert_eq!(d.len(), 128);
        assert!(d.starts_with("ddaf35a193617aba"));
    }

    #[test]
    fn test_passhash_composition() {
        let salt = calculate_salt("mary");
        assert_eq!(
            calculate_passhash("mary", "marymary"),
            digest(&format!("marymary:{salt}"))
        );
    }

    #[test]
    fn test_passhash_depends_on_account_name() {
        assert_ne!(
            calculate_passhash("alice", "password"),
            calculate_passhash("alicf", "password")
        );
    }

    #[test]
    fn test_verify_passhash() {
        let stored = calculate_passhash("bob_01", "s3cret_pw");
        assert!(verify_passhash("bob_01", "s3cret_pw", &stored));
        assert!(!verify_passhash("bob_01", "s3cret_px", &stored));
        assert!(!verify_passhash("bob_02", "s3cret_pw", &stored));
    }
}
