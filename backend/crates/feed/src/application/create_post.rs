//! Create Post Use Case
//!
//! Upload gate: login, CSRF, then the image checks in order. Rejections
//! are outcomes (shown as a flash notice), not errors.

use std::sync::Arc;

use auth::SessionContext;
use kernel::id::PostId;

use crate::application::config::FeedConfig;
use crate::domain::entities::NewPost;
use crate::domain::repository::{FeedStore, ImageMirror};
use crate::domain::value_objects::ImageMime;
use crate::error::FeedResult;

/// File part of the upload form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Declared content type of the part
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Create post input
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    pub csrf_token: String,
    pub file: Option<UploadedFile>,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRejection {
    ImageRequired,
    UnsupportedFormat,
    TooLarge,
}

impl UploadRejection {
    /// Notice shown on the home page
    pub fn notice(&self) -> &'static str {
        match self {
            UploadRejection::ImageRequired => "An image is required",
            UploadRejection::UnsupportedFormat => "Only jpg, png and gif images can be posted",
            UploadRejection::TooLarge => "The file is too large",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatePostOutcome {
    Created(PostId),
    Rejected(UploadRejection),
}

pub struct CreatePostUseCase<F, M>
where
    F: FeedStore,
    M: ImageMirror + Sync,
{
    repo: Arc<F>,
    mirror: Arc<M>,
    config: Arc<FeedConfig>,
}

impl<F, M> CreatePostUseCase<F, M>
where
    F: FeedStore,
    M: ImageMirror + Sync,
{
    pub fn new(repo: Arc<F>, mirror: Arc<M>, config: Arc<FeedConfig>) -> Self {
        Self {
            repo,
            mirror,
            config,
        }
    }

    pub async fn execute(
        &self,
        ctx: &SessionContext,
        input: CreatePostInput,
    ) -> FeedResult<CreatePostOutcome> {
        let me = ctx.require_login()?;
        ctx.check_csrf(&input.csrf_token)?;

        let mime_and_data = match input.file {
            None => Err(UploadRejection::ImageRequired),
            Some(file) => match ImageMime::from_content_type(&file.content_type) {
                None => Err(UploadRejection::UnsupportedFormat),
                Some(_) if file.data.len() > self.config.upload_limit_bytes => {
                    Err(UploadRejection::TooLarge)
                }
                Some(mime) => Ok((mime, file.data)),
            },
        };

        let (mime, imgdata) = match mime_and_data {
            Ok(accepted) => accepted,
            Err(rejection) => {
                tracing::info!(account_id = %me.id, ?rejection, "Upload rejected");
                return Ok(CreatePostOutcome::Rejected(rejection));
            }
        };

        let post = NewPost {
            account_id: me.id,
            mime,
            imgdata,
            body: input.body,
        };
        let post_id = self.repo.create_post(&post).await?;

        // The database copy is authoritative
        if let Err(e) = self.mirror.write(post_id, mime, &post.imgdata).await {
            tracing::warn!(post_id = %post_id, error = %e, "Failed to mirror image");
        }

        tracing::info!(post_id = %post_id, account_id = %me.id, mime = %mime, "Post created");
        Ok(CreatePostOutcome::Created(post_id))
    }
}
