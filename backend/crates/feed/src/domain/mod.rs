//! Domain Layer
//!
//! Entities, value objects, repository traits and pure services.

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use entities::{
    AccountStats, Author, Comment, CommentView, NewComment, NewPost, Post, PostAggregate,
    PostImage, PostWithAuthor,
};
pub use repository::{
    AuthorRepository, CommentRepository, FeedStore, ImageMirror, PostRepository,
};
pub use value_objects::{CommentWindow, FeedQuery, ImageMime};
