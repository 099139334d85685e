//! Post Aggregator
//!
//! Turns post rows into [`PostAggregate`]s: author, comment count, a window
//! of comments (each with its author) and the caller's CSRF token.
//!
//! Two strategies share one contract:
//! - [`BatchedAggregator`] - one posts x accounts join, then per post a
//!   count and one comments x accounts join. Used by every listing.
//! - [`NaiveAggregator`] - raw rows and one lookup per comment author.
//!   Used by the single-post page, where the fan-out is one post.
//!
//! Both return newest posts first, at most `page_size` of them, with
//! comments oldest first.

use std::sync::Arc;

use crate::application::config::FeedConfig;
use crate::domain::entities::{CommentView, PostAggregate};
use crate::domain::repository::FeedStore;
use crate::domain::services::chronological;
use crate::domain::value_objects::{CommentWindow, FeedQuery};
use crate::error::{FeedError, FeedResult};

#[trait_variant::make(PostAggregator: Send)]
pub trait LocalPostAggregator {
    async fn aggregate(
        &self,
        query: &FeedQuery,
        csrf_token: &str,
        window: CommentWindow,
    ) -> FeedResult<Vec<PostAggregate>>;
}

// ============================================================================
// Batched
// ============================================================================

pub struct BatchedAggregator<F>
where
    F: FeedStore,
{
    repo: Arc<F>,
    config: Arc<FeedConfig>,
}

impl<F> BatchedAggregator<F>
where
    F: FeedStore,
{
    pub fn new(repo: Arc<F>, config: Arc<FeedConfig>) -> Self {
        Self { repo, config }
    }
}

impl<F> PostAggregator for BatchedAggregator<F>
where
    F: FeedStore,
{
    async fn aggregate(
        &self,
        query: &FeedQuery,
        csrf_token: &str,
        window: CommentWindow,
    ) -> FeedResult<Vec<PostAggregate>> {
        let rows = self
            .repo
            .find_posts_with_authors(query, self.config.page_size)
            .await?;

        let limit = window.limit(self.config.comment_preview);
        let mut posts = Vec::with_capacity(rows.len());

        for row in rows {
            let comment_count = self.repo.count_comments(row.post.id).await?;
            let comments = self
                .repo
                .find_comments_with_authors(row.post.id, limit)
                .await?;

            posts.push(PostAggregate::assemble(
                row.post,
                row.author,
                comment_count,
                chronological(comments),
                csrf_token,
            ));
        }

        Ok(posts)
    }
}

// ============================================================================
// Naive
// ============================================================================

pub struct NaiveAggregator<F>
where
    F: FeedStore,
{
    repo: Arc<F>,
    config: Arc<FeedConfig>,
}

impl<F> NaiveAggregator<F>
where
    F: FeedStore,
{
    pub fn new(repo: Arc<F>, config: Arc<FeedConfig>) -> Self {
        Self { repo, config }
    }
}

impl<F> PostAggregator for NaiveAggregator<F>
where
    F: FeedStore,
{
    async fn aggregate(
        &self,
        query: &FeedQuery,
        csrf_token: &str,
        window: CommentWindow,
    ) -> FeedResult<Vec<PostAggregate>> {
        let candidates = self.repo.find_posts(query).await?;
        let limit = window.limit(self.config.comment_preview);
        let mut posts = Vec::new();

        for post in candidates {
            let comment_count = self.repo.count_comments(post.id).await?;

            let mut comments = Vec::new();
            for comment in self.repo.find_comments(post.id, limit).await? {
                let user = self
                    .repo
                    .find_author(comment.account_id)
                    .await?
                    .ok_or_else(|| missing_author(comment.account_id))?;
                comments.push(CommentView::new(comment, user));
            }

            let user = self
                .repo
                .find_author(post.account_id)
                .await?
                .ok_or_else(|| missing_author(post.account_id))?;

            if user.is_banned() {
                continue;
            }

            posts.push(PostAggregate::assemble(
                post,
                user,
                comment_count,
                chronological(comments),
                csrf_token,
            ));

            if posts.len() >= self.config.page_size {
                break;
            }
        }

        Ok(posts)
    }
}

fn missing_author(account_id: kernel::id::AccountId) -> FeedError {
    FeedError::Internal(format!("account {account_id} referenced but missing"))
}
