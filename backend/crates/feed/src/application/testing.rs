//! Shared fixtures for use-case tests

use std::sync::{Arc, Mutex, PoisonError};

use auth::SessionContext;
use auth::domain::repository::AccountRepository;
use kernel::id::PostId;

use crate::domain::repository::ImageMirror;
use crate::domain::value_objects::ImageMime;
use crate::infra::memory::InMemoryFeedRepository;

/// Mirror that records writes instead of touching the disk
#[derive(Default)]
pub struct RecordingMirror {
    writes: Mutex<Vec<(PostId, ImageMime, usize)>>,
    fail: bool,
}

impl RecordingMirror {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn written(&self) -> Vec<(PostId, ImageMime, usize)> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ImageMirror for RecordingMirror {
    async fn write(&self, post_id: PostId, mime: ImageMime, data: &[u8]) -> std::io::Result<()> {
        if self.fail {
            return Err(std::io::Error::other("read-only file system"));
        }
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((post_id, mime, data.len()));
        Ok(())
    }
}

/// Register `account_name` and build a logged-in context for it
pub async fn logged_in(
    repo: &Arc<InMemoryFeedRepository>,
    account_name: &str,
    csrf_token: &str,
) -> SessionContext {
    let id = repo.add_account(account_name).await;
    let account = repo.accounts().find_account(id).await.unwrap();

    SessionContext {
        session_id: None,
        me: account,
        csrf_token: csrf_token.to_string(),
    }
}
