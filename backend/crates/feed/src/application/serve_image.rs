//! Serve Image Use Case

use std::sync::Arc;

use kernel::id::PostId;

use crate::domain::entities::PostImage;
use crate::domain::repository::{FeedStore, ImageMirror};
use crate::domain::value_objects::ImageMime;
use crate::error::{FeedError, FeedResult};

pub struct ServeImageUseCase<F, M>
where
    F: FeedStore,
    M: ImageMirror + Sync,
{
    repo: Arc<F>,
    mirror: Arc<M>,
}

impl<F, M> ServeImageUseCase<F, M>
where
    F: FeedStore,
    M: ImageMirror + Sync,
{
    pub fn new(repo: Arc<F>, mirror: Arc<M>) -> Self {
        Self { repo, mirror }
    }

    /// Image bytes for `/image/{id}.{ext}`. The extension must match the
    /// stored format; on mismatch the image is mirrored under its real
    /// extension and the request is not found.
    pub async fn execute(&self, post_id: PostId, extension: &str) -> FeedResult<PostImage> {
        let image = self
            .repo
            .find_image(post_id)
            .await?
            .ok_or(FeedError::NotFound)?;

        if ImageMime::from_extension(extension) == Some(image.mime) {
            return Ok(image);
        }

        if let Err(e) = self.mirror.write(post_id, image.mime, &image.imgdata).await {
            tracing::warn!(post_id = %post_id, error = %e, "Failed to mirror image");
        }
        Err(FeedError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::RecordingMirror;
    use crate::infra::memory::InMemoryFeedRepository;

    #[tokio::test]
    async fn test_serve_matching_extension() {
        let repo = Arc::new(InMemoryFeedRepository::default());
        let mirror = Arc::new(RecordingMirror::default());
        let mary = repo.add_account("mary").await;
        let post = repo.add_post(mary);

        let image = ServeImageUseCase::new(repo.clone(), mirror.clone())
            .execute(post, "png")
            .await
            .unwrap();

        assert_eq!(image.mime, ImageMime::Png);
        assert!(!image.imgdata.is_empty());
        assert!(mirror.written().is_empty());
    }

    #[tokio::test]
    async fn test_mismatched_extension_mirrors_and_404s() {
        let repo = Arc::new(InMemoryFeedRepository::default());
        let mirror = Arc::new(RecordingMirror::default());
        let mary = repo.add_account("mary").await;
        let post = repo.add_post(mary);
        let uc = ServeImageUseCase::new(repo.clone(), mirror.clone());

        for ext in ["jpg", "gif", "exe"] {
            assert!(matches!(uc.execute(post, ext).await, Err(FeedError::NotFound)));
        }
        assert_eq!(mirror.written().len(), 3);
        assert!(mirror.written().iter().all(|(_, mime, _)| *mime == ImageMime::Png));
    }

    #[tokio::test]
    async fn test_missing_post() {
        let repo = Arc::new(InMemoryFeedRepository::default());
        let mirror = Arc::new(RecordingMirror::default());

        let result = ServeImageUseCase::new(repo, mirror.clone())
            .execute(PostId::new(1), "png")
            .await;

        assert!(matches!(result, Err(FeedError::NotFound)));
        assert!(mirror.written().is_empty());
    }
}
