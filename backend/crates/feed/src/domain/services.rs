//! Domain Services

use kernel::id::PostId;

use super::entities::PostAggregate;
use super::value_objects::ImageMime;

/// Newest-first rows into oldest-first order
pub fn chronological<T>(mut newest_first: Vec<T>) -> Vec<T> {
    newest_first.reverse();
    newest_first
}

/// `/image/{id}.{ext}`
pub fn image_url(post_id: PostId, mime: ImageMime) -> String {
    format!("/image/{}.{}", post_id, mime.extension())
}

/// Overwrite the echoed CSRF token on every aggregate
pub fn stamp_csrf(posts: &mut [PostAggregate], csrf_token: &str) {
    for post in posts {
        post.csrf_token.clear();
        post.csrf_token.push_str(csrf_token);
    }
}
