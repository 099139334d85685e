//! Value Objects for the feed

use chrono::{DateTime, FixedOffset, Utc};
use kernel::id::{AccountId, PostId};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ImageMime
// ============================================================================

/// The three accepted image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageMime {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/gif")]
    Gif,
}

impl ImageMime {
    pub const ALL: [ImageMime; 3] = [ImageMime::Jpeg, ImageMime::Png, ImageMime::Gif];

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Gif => "image/gif",
        }
    }

    /// File extension without the dot
    #[inline]
    pub const fn extension(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "jpg",
            ImageMime::Png => "png",
            ImageMime::Gif => "gif",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.extension() == ext)
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == mime)
    }

    /// Map a declared upload content type. The type must mention exactly
    /// one of `jpeg`, `png`, `gif`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let lowered = content_type.to_ascii_lowercase();
        let mut matches = Self::ALL.into_iter().filter(|m| lowered.contains(m.keyword()));

        match (matches.next(), matches.next()) {
            (Some(mime), None) => Some(mime),
            _ => None,
        }
    }

    const fn keyword(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "jpeg",
            ImageMime::Png => "png",
            ImageMime::Gif => "gif",
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FeedQuery / CommentWindow
// ============================================================================

/// Which posts a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedQuery {
    /// Newest posts
    Home,
    /// Posts by one account
    ByAccount(AccountId),
    /// Posts created at or before the cursor
    CreatedAtOrBefore(DateTime<Utc>),
    /// One post
    Single(PostId),
}

impl FeedQuery {
    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            FeedQuery::ByAccount(id) => Some(*id),
            _ => None,
        }
    }

    pub fn max_created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            FeedQuery::CreatedAtOrBefore(at) => Some(*at),
            _ => None,
        }
    }

    pub fn post_id(&self) -> Option<PostId> {
        match self {
            FeedQuery::Single(id) => Some(*id),
            _ => None,
        }
    }
}

/// How many comments each aggregate carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentWindow {
    /// Newest `preview` comments
    Recent,
    All,
}

impl CommentWindow {
    pub fn limit(&self, preview: usize) -> Option<usize> {
        match self {
            CommentWindow::Recent => Some(preview),
            CommentWindow::All => None,
        }
    }
}

// ============================================================================
// Cursor
// ============================================================================

/// Cursor format used by the listing page (`2006-01-02T15:04:05+09:00`)
pub const CURSOR_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid max_created_at: {0}")]
pub struct CursorError(pub String);

/// Parse a `max_created_at` cursor. A space in place of `+` is tolerated
/// because form decoding turns `+` into a space.
pub fn parse_cursor(raw: &str) -> Result<DateTime<Utc>, CursorError> {
    let normalized = raw.trim().replace(' ', "+");

    DateTime::<FixedOffset>::parse_from_str(&normalized, CURSOR_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(&normalized))
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| CursorError(raw.to_string()))
}

/// Render a timestamp in cursor format
pub fn format_cursor(at: &DateTime<Utc>) -> String {
    at.format(CURSOR_FORMAT).to_string()
}
