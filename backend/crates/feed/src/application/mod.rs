//! Application Layer
//!
//! Use cases, the post aggregator and the home feed snapshot cache.

pub mod account_page;
pub mod aggregator;
pub mod config;
pub mod create_comment;
pub mod create_post;
pub mod serve_image;
pub mod snapshot;
pub mod timeline;

#[cfg(test)]
pub(crate) mod testing;

pub use account_page::{AccountPageOutput, AccountPageUseCase};
pub use aggregator::{BatchedAggregator, NaiveAggregator, PostAggregator};
pub use config::FeedConfig;
pub use create_comment::{CreateCommentInput, CreateCommentUseCase};
pub use create_post::{
    CreatePostInput, CreatePostOutcome, CreatePostUseCase, UploadRejection, UploadedFile,
};
pub use serve_image::ServeImageUseCase;
pub use snapshot::SnapshotCache;
pub use timeline::TimelineUseCase;
