//! Value Object Module

pub mod account_name;
pub mod authority;
pub mod password;

pub use account_name::{AccountName, AccountNameError};
pub use authority::Authority;
pub use kernel::id::AccountId;
pub use password::{PasswordError, RawPassword};
