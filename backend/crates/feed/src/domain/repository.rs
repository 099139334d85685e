//! Repository Traits

use kernel::id::{AccountId, CommentId, PostId};

use super::entities::{
    AccountStats, Author, Comment, CommentView, NewComment, NewPost, Post, PostImage, PostWithAuthor,
};
use super::value_objects::{FeedQuery, ImageMime};
use crate::error::FeedResult;

/// Post repository trait
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    /// Posts joined with their authors, banned authors excluded,
    /// newest first, at most `limit` rows
    async fn find_posts_with_authors(
        &self,
        query: &FeedQuery,
        limit: usize,
    ) -> FeedResult<Vec<PostWithAuthor>>;

    /// Raw posts matching `query`, newest first, no ban filter
    async fn find_posts(&self, query: &FeedQuery) -> FeedResult<Vec<Post>>;

    /// Find post by ID
    async fn find_post(&self, post_id: PostId) -> FeedResult<Option<Post>>;

    /// Image bytes and stored mime of a post
    async fn find_image(&self, post_id: PostId) -> FeedResult<Option<PostImage>>;

    /// Insert a post, returning its id
    async fn create_post(&self, post: &NewPost) -> FeedResult<PostId>;
}

/// Comment repository trait
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    /// Total comments on a post
    async fn count_comments(&self, post_id: PostId) -> FeedResult<i64>;

    /// Comments joined with their authors, newest first
    async fn find_comments_with_authors(
        &self,
        post_id: PostId,
        limit: Option<usize>,
    ) -> FeedResult<Vec<CommentView>>;

    /// Raw comments, newest first
    async fn find_comments(&self, post_id: PostId, limit: Option<usize>) -> FeedResult<Vec<Comment>>;

    /// Insert a comment, returning its id
    async fn create_comment(&self, comment: &NewComment) -> FeedResult<CommentId>;
}

/// Author lookups for aggregation and the account page
#[trait_variant::make(AuthorRepository: Send)]
pub trait LocalAuthorRepository {
    /// Find author by ID, banned or not
    async fn find_author(&self, account_id: AccountId) -> FeedResult<Option<Author>>;

    /// Find a non-banned author by account name
    async fn find_active_author_by_name(&self, account_name: &str) -> FeedResult<Option<Author>>;

    /// Post, comment and commented counters
    async fn account_stats(&self, account_id: AccountId) -> FeedResult<AccountStats>;
}

/// Best-effort copy of uploaded images to the static file tree
#[trait_variant::make(ImageMirror: Send)]
pub trait LocalImageMirror {
    async fn write(&self, post_id: PostId, mime: ImageMime, data: &[u8]) -> std::io::Result<()>;
}

/// Everything the feed persists, behind one handle
pub trait FeedStore:
    PostRepository + CommentRepository + AuthorRepository + Clone + Send + Sync + 'static
{
}

impl<T> FeedStore for T where
    T: PostRepository + CommentRepository + AuthorRepository + Clone + Send + Sync + 'static
{
}
