//! Application Configuration
//!
//! Configuration for the feed application layer.

use std::path::PathBuf;
use std::time::Duration;

use platform::cache::CacheConfig;

/// Feed application configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Posts per listing page
    pub page_size: usize,
    /// Comments shown per post on listing pages
    pub comment_preview: usize,
    /// Maximum decoded image size
    pub upload_limit_bytes: usize,
    /// Request body limit for the upload route (must exceed the upload limit)
    pub request_body_limit_bytes: usize,
    /// Home feed snapshot lifetime
    pub cache_ttl: Duration,
    /// Cache key of the home feed snapshot
    pub home_feed_key: String,
    /// Static file root; mirrored images go to `{public_dir}/image`
    pub public_dir: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            comment_preview: 3,
            upload_limit_bytes: 10 * 1024 * 1024, // 10 MiB
            request_body_limit_bytes: 32 * 1024 * 1024,
            cache_ttl: Duration::from_secs(5),
            home_feed_key: "home-feed".to_string(),
            public_dir: PathBuf::from("../public"),
        }
    }
}

impl FeedConfig {
    /// Directory mirrored images are written to
    pub fn image_dir(&self) -> PathBuf {
        self.public_dir.join("image")
    }

    /// Object cache settings derived from this config
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: self.cache_ttl,
            ..CacheConfig::default()
        }
    }
}
