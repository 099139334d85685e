//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by the `auth` and `feed` crates:
//! - The unified error type and its HTTP mapping
//! - Typed row IDs for accounts, posts and comments

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
