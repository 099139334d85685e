//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod config;
pub mod moderation;
pub mod register;
pub mod session_gate;

// Re-exports
pub use authenticate::{AuthenticateUseCase, LoginInput, LoginOutput, validate_credentials_format};
pub use config::AuthConfig;
pub use moderation::{BanOutcome, ModerationUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use session_gate::{SessionContext, SessionGate};
