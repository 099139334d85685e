//! Create Comment Use Case

use std::sync::Arc;

use auth::SessionContext;
use kernel::id::PostId;

use crate::domain::entities::NewComment;
use crate::domain::repository::FeedStore;
use crate::error::{FeedError, FeedResult};

/// Create comment input (raw form values)
#[derive(Debug, Clone)]
pub struct CreateCommentInput {
    pub post_id: String,
    pub comment: String,
    pub csrf_token: String,
}

pub struct CreateCommentUseCase<F>
where
    F: FeedStore,
{
    repo: Arc<F>,
}

impl<F> CreateCommentUseCase<F>
where
    F: FeedStore,
{
    pub fn new(repo: Arc<F>) -> Self {
        Self { repo }
    }

    /// Returns the commented post
    pub async fn execute(&self, ctx: &SessionContext, input: CreateCommentInput) -> FeedResult<PostId> {
        let me = ctx.require_login()?;
        ctx.check_csrf(&input.csrf_token)?;

        let post_id: PostId = input.post_id.parse().map_err(|_| FeedError::InvalidPostId)?;

        if self.repo.find_post(post_id).await?.is_none() {
            return Err(FeedError::NotFound);
        }

        let comment_id = self
            .repo
            .create_comment(&NewComment {
                post_id,
                account_id: me.id,
                comment: input.comment,
            })
            .await?;

        tracing::info!(comment_id = %comment_id, post_id = %post_id, account_id = %me.id, "Comment created");
        Ok(post_id)
    }
}
