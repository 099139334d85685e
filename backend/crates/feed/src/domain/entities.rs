//! Domain Entities

use auth::models::Authority;
use chrono::{DateTime, Utc};
use kernel::id::{AccountId, CommentId, PostId};
use serde::{Deserialize, Serialize};

use super::services::image_url;
use super::value_objects::ImageMime;

/// Account as shown next to posts and comments (no pass-hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AccountId,
    pub account_name: String,
    pub authority: Authority,
    pub del_flg: bool,
    pub created_at: DateTime<Utc>,
}

impl Author {
    #[inline]
    pub fn is_banned(&self) -> bool {
        self.del_flg
    }
}

impl From<&auth::Account> for Author {
    fn from(account: &auth::Account) -> Self {
        Self {
            id: account.id,
            account_name: account.account_name.as_str().to_string(),
            authority: account.authority,
            del_flg: account.del_flg,
            created_at: account.created_at,
        }
    }
}

/// Post metadata (image bytes are loaded separately)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub account_id: AccountId,
    pub body: String,
    pub mime: ImageMime,
    pub created_at: DateTime<Utc>,
}

/// Stored image of a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostImage {
    pub post_id: PostId,
    pub mime: ImageMime,
    pub imgdata: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub account_id: AccountId,
    pub mime: ImageMime,
    pub imgdata: Vec<u8>,
    pub body: String,
}

/// One row of the posts x accounts join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Author,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub account_id: AccountId,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: PostId,
    pub account_id: AccountId,
    pub comment: String,
}

/// Comment annotated with its author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: CommentId,
    pub post_id: PostId,
    pub account_id: AccountId,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub user: Author,
}

impl CommentView {
    pub fn new(comment: Comment, user: Author) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            account_id: comment.account_id,
            comment: comment.comment,
            created_at: comment.created_at,
            user,
        }
    }
}

/// Fully populated feed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAggregate {
    pub id: PostId,
    pub account_id: AccountId,
    pub body: String,
    pub mime: ImageMime,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    /// Total comments on the post, independent of the window
    pub comment_count: i64,
    /// Oldest first
    pub comments: Vec<CommentView>,
    pub user: Author,
    pub csrf_token: String,
}

impl PostAggregate {
    pub fn assemble(
        post: Post,
        user: Author,
        comment_count: i64,
        comments: Vec<CommentView>,
        csrf_token: &str,
    ) -> Self {
        Self {
            image_url: image_url(post.id, post.mime),
            id: post.id,
            account_id: post.account_id,
            body: post.body,
            mime: post.mime,
            created_at: post.created_at,
            comment_count,
            comments,
            user,
            csrf_token: csrf_token.to_string(),
        }
    }
}

/// Activity counters for the account page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AccountStats {
    pub post_count: i64,
    /// Comments written by the account
    pub comment_count: i64,
    /// Comments received on the account's posts
    pub commented_count: i64,
}
