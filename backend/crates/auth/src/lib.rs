//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and the session gate
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, session middleware
//!
//! ## Features
//! - Registration and login with account name + password
//! - Server-side sessions referenced by an HMAC-signed cookie
//! - Per-session CSRF tokens and one-shot flash notices
//! - Moderator soft-ban workflow
//!
//! ## Security Model
//! - Pass-hashes are salted SHA-512 (`platform::password`)
//! - Sessions are rotated on every login
//! - Banned accounts resolve as anonymous

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::session_gate::{SessionContext, SessionGate};
pub use domain::entity::Account;
pub use domain::repository::AuthStore;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::{auth_router, with_session_context};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod response {
    pub use crate::presentation::response::*;
}
