//! API DTOs (Data Transfer Objects)
//!
//! Pages are served as JSON views; forms are URL-encoded or multipart.

use auth::models::AccountView;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{AccountStats, Author, PostAggregate};

// ============================================================================
// Requests
// ============================================================================

/// `GET /posts?max_created_at=...`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostsQuery {
    pub max_created_at: Option<String>,
}

/// `POST /comment`
#[derive(Debug, Clone, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub post_id: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub csrf_token: String,
}

// ============================================================================
// Views
// ============================================================================

/// Home page
#[derive(Debug, Clone, Serialize)]
pub struct IndexView {
    pub me: Option<AccountView>,
    pub posts: Vec<PostAggregate>,
    pub csrf_token: String,
    pub flash: Option<String>,
}

/// Single post page
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailView {
    pub me: Option<AccountView>,
    pub post: PostAggregate,
}

/// Account page
#[derive(Debug, Clone, Serialize)]
pub struct AccountPageView {
    pub me: Option<AccountView>,
    pub user: Author,
    pub posts: Vec<PostAggregate>,
    pub post_count: i64,
    pub comment_count: i64,
    pub commented_count: i64,
}

impl AccountPageView {
    pub fn new(me: Option<AccountView>, user: Author, posts: Vec<PostAggregate>, stats: AccountStats) -> Self {
        Self {
            me,
            user,
            posts,
            post_count: stats.post_count,
            comment_count: stats.comment_count,
            commented_count: stats.commented_count,
        }
    }
}
