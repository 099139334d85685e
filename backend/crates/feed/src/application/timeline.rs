//! Timeline Use Cases
//!
//! Home feed (cache-first), cursor listing and single-post page.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::PostId;
use platform::cache::ObjectCache;

use crate::application::aggregator::{BatchedAggregator, NaiveAggregator, PostAggregator};
use crate::application::config::FeedConfig;
use crate::application::snapshot::SnapshotCache;
use crate::domain::entities::PostAggregate;
use crate::domain::repository::FeedStore;
use crate::domain::services::stamp_csrf;
use crate::domain::value_objects::{CommentWindow, FeedQuery};
use crate::error::{FeedError, FeedResult};

pub struct TimelineUseCase<F, C>
where
    F: FeedStore,
    C: ObjectCache + Sync,
{
    repo: Arc<F>,
    cache: SnapshotCache<C>,
    config: Arc<FeedConfig>,
}

impl<F, C> TimelineUseCase<F, C>
where
    F: FeedStore,
    C: ObjectCache + Sync,
{
    pub fn new(repo: Arc<F>, cache: SnapshotCache<C>, config: Arc<FeedConfig>) -> Self {
        Self {
            repo,
            cache,
            config,
        }
    }

    fn batched(&self) -> BatchedAggregator<F> {
        BatchedAggregator::new(self.repo.clone(), self.config.clone())
    }

    /// Newest posts. Served from the snapshot cache when fresh; otherwise
    /// aggregated and stored. Snapshots are stored without a CSRF token and
    /// stamped with the caller's token on the way out.
    pub async fn home(&self, csrf_token: &str) -> FeedResult<Vec<PostAggregate>> {
        let key = self.config.home_feed_key.as_str();

        let mut posts = match self.cache.get::<Vec<PostAggregate>>(key).await {
            Some(posts) => posts,
            None => {
                let posts = self
                    .batched()
                    .aggregate(&FeedQuery::Home, "", CommentWindow::Recent)
                    .await?;
                self.cache.put(key, &posts).await;
                posts
            }
        };

        stamp_csrf(&mut posts, csrf_token);
        Ok(posts)
    }

    /// Posts created at or before `cursor`. Empty result is not found.
    pub async fn before(&self, cursor: DateTime<Utc>, csrf_token: &str) -> FeedResult<Vec<PostAggregate>> {
        let posts = self
            .batched()
            .aggregate(
                &FeedQuery::CreatedAtOrBefore(cursor),
                csrf_token,
                CommentWindow::Recent,
            )
            .await?;

        if posts.is_empty() {
            return Err(FeedError::NotFound);
        }
        Ok(posts)
    }

    /// One post with all of its comments
    pub async fn post_detail(&self, post_id: PostId, csrf_token: &str) -> FeedResult<PostAggregate> {
        NaiveAggregator::new(self.repo.clone(), self.config.clone())
            .aggregate(&FeedQuery::Single(post_id), csrf_token, CommentWindow::All)
            .await?
            .into_iter()
            .next()
            .ok_or(FeedError::NotFound)
    }
}
