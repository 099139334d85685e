//! Filesystem image mirror
//!
//! Writes `{dir}/{post_id}.{ext}` so the static file service can answer
//! later image requests without touching the database.

use std::path::{Path, PathBuf};

use kernel::id::PostId;

use crate::domain::repository::ImageMirror;
use crate::domain::value_objects::ImageMime;

#[derive(Debug, Clone)]
pub struct FsImageMirror {
    dir: PathBuf,
}

impl FsImageMirror {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, post_id: PostId, mime: ImageMime) -> PathBuf {
        self.dir.join(format!("{}.{}", post_id, mime.extension()))
    }
}

impl ImageMirror for FsImageMirror {
    async fn write(&self, post_id: PostId, mime: ImageMime, data: &[u8]) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(post_id, mime);
        tokio::fs::write(&path, data).await?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "Image mirrored");
        Ok(())
    }
}
