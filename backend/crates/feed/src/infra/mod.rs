//! Infrastructure Layer
//!
//! Database and filesystem implementations.

pub mod fs_mirror;
#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use fs_mirror::FsImageMirror;
pub use postgres::PgFeedRepository;
