//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::resolve_session;
pub use router::{auth_router, auth_router_generic, with_session_context};
