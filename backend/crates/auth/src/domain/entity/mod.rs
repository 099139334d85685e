pub mod account;
pub mod session;

pub use account::{Account, NewAccount};
pub use session::Session;
