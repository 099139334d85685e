//! Account Page Use Case

use std::sync::Arc;

use crate::application::aggregator::{BatchedAggregator, PostAggregator};
use crate::application::config::FeedConfig;
use crate::domain::entities::{AccountStats, Author, PostAggregate};
use crate::domain::repository::FeedStore;
use crate::domain::value_objects::{CommentWindow, FeedQuery};
use crate::error::{FeedError, FeedResult};

#[derive(Debug, Clone)]
pub struct AccountPageOutput {
    pub user: Author,
    pub posts: Vec<PostAggregate>,
    pub stats: AccountStats,
}

pub struct AccountPageUseCase<F>
where
    F: FeedStore,
{
    repo: Arc<F>,
    config: Arc<FeedConfig>,
}

impl<F> AccountPageUseCase<F>
where
    F: FeedStore,
{
    pub fn new(repo: Arc<F>, config: Arc<FeedConfig>) -> Self {
        Self { repo, config }
    }

    /// Banned or unknown accounts are not found
    pub async fn execute(&self, account_name: &str, csrf_token: &str) -> FeedResult<AccountPageOutput> {
        let user = self
            .repo
            .find_active_author_by_name(account_name)
            .await?
            .ok_or(FeedError::NotFound)?;

        let posts = BatchedAggregator::new(self.repo.clone(), self.config.clone())
            .aggregate(&FeedQuery::ByAccount(user.id), csrf_token, CommentWindow::Recent)
            .await?;

        let stats = self.repo.account_stats(user.id).await?;

        Ok(AccountPageOutput { user, posts, stats })
    }
}
