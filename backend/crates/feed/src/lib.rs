//! Feed Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, post aggregation, home feed snapshots
//! - `infra/` - Database and filesystem implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Home feed served from a short-lived snapshot cache
//! - Cursor pagination over `created_at`
//! - Image upload with format and size checks, mirrored to the static tree
//! - Comments, account pages with activity counters
//!
//! Every route expects the `SessionContext` extension installed by
//! `auth::with_session_context`.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::FeedConfig;
pub use error::{FeedError, FeedResult};
pub use infra::postgres::PgFeedRepository;
pub use presentation::router::{feed_router, feed_router_generic};
