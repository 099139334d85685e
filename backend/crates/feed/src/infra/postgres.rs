//! PostgreSQL Repository Implementations

use auth::models::Authority;
use chrono::{DateTime, Utc};
use kernel::id::{AccountId, CommentId, PostId};
use sqlx::PgPool;

use crate::domain::entities::{
    AccountStats, Author, Comment, CommentView, NewComment, NewPost, Post, PostImage, PostWithAuthor,
};
use crate::domain::repository::{AuthorRepository, CommentRepository, PostRepository};
use crate::domain::value_objects::{FeedQuery, ImageMime};
use crate::error::{FeedError, FeedResult};

/// PostgreSQL-backed feed repository
#[derive(Clone)]
pub struct PgFeedRepository {
    pool: PgPool,
}

impl PgFeedRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Shared filter over `posts p` for every [`FeedQuery`]
const POST_FILTER: &str = r#"
    ($1::BIGINT IS NULL OR p.account_id = $1)
    AND ($2::TIMESTAMPTZ IS NULL OR p.created_at <= $2)
    AND ($3::BIGINT IS NULL OR p.id = $3)
"#;

fn bind_limit(limit: Option<usize>) -> Option<i64> {
    limit.map(|n| i64::try_from(n).unwrap_or(i64::MAX))
}

// ============================================================================
// Post Repository Implementation
// ============================================================================

impl PostRepository for PgFeedRepository {
    async fn find_posts_with_authors(
        &self,
        query: &FeedQuery,
        limit: usize,
    ) -> FeedResult<Vec<PostWithAuthor>> {
        let sql = format!(
            r#"
            SELECT p.id, p.account_id, p.body, p.mime, p.created_at,
                   a.account_name AS author_name, a.authority AS author_authority,
                   a.del_flg AS author_del_flg, a.created_at AS author_created_at
            FROM posts p
            JOIN accounts a ON a.id = p.account_id
            WHERE a.del_flg = FALSE AND {POST_FILTER}
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $4
            "#
        );

        let rows = sqlx::query_as::<_, PostWithAuthorRow>(&sql)
            .bind(query.account_id().map(|id| id.get()))
            .bind(query.max_created_at())
            .bind(query.post_id().map(|id| id.get()))
            .bind(bind_limit(Some(limit)))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PostWithAuthorRow::into_domain).collect()
    }

    async fn find_posts(&self, query: &FeedQuery) -> FeedResult<Vec<Post>> {
        let sql = format!(
            r#"
            SELECT p.id, p.account_id, p.body, p.mime, p.created_at
            FROM posts p
            WHERE {POST_FILTER}
            ORDER BY p.created_at DESC, p.id DESC
            "#
        );

        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(query.account_id().map(|id| id.get()))
            .bind(query.max_created_at())
            .bind(query.post_id().map(|id| id.get()))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PostRow::into_post).collect()
    }

    async fn find_post(&self, post_id: PostId) -> FeedResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, account_id, body, mime, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PostRow::into_post).transpose()
    }

    async fn find_image(&self, post_id: PostId) -> FeedResult<Option<PostImage>> {
        let row = sqlx::query_as::<_, ImageRow>("SELECT id, mime, imgdata FROM posts WHERE id = $1")
            .bind(post_id.get())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(PostImage {
                post_id: PostId::new(row.id),
                mime: parse_mime(&row.mime)?,
                imgdata: row.imgdata,
            })
        })
        .transpose()
    }

    async fn create_post(&self, post: &NewPost) -> FeedResult<PostId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO posts (account_id, mime, imgdata, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(post.account_id.get())
        .bind(post.mime.as_str())
        .bind(&post.imgdata)
        .bind(&post.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(PostId::new(id))
    }
}

// ============================================================================
// Comment Repository Implementation
// ============================================================================

impl CommentRepository for PgFeedRepository {
    async fn count_comments(&self, post_id: PostId) -> FeedResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id.get())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn find_comments_with_authors(
        &self,
        post_id: PostId,
        limit: Option<usize>,
    ) -> FeedResult<Vec<CommentView>> {
        let rows = sqlx::query_as::<_, CommentWithAuthorRow>(
            r#"
            SELECT c.id, c.post_id, c.account_id, c.comment, c.created_at,
                   a.account_name AS author_name, a.authority AS author_authority,
                   a.del_flg AS author_del_flg, a.created_at AS author_created_at
            FROM comments c
            JOIN accounts a ON a.id = c.account_id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT $2
            "#,
        )
        .bind(post_id.get())
        .bind(bind_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentWithAuthorRow::into_view).collect())
    }

    async fn find_comments(&self, post_id: PostId, limit: Option<usize>) -> FeedResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, account_id, comment, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(post_id.get())
        .bind(bind_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }

    async fn create_comment(&self, comment: &NewComment) -> FeedResult<CommentId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO comments (post_id, account_id, comment)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(comment.post_id.get())
        .bind(comment.account_id.get())
        .bind(&comment.comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(CommentId::new(id))
    }
}

// ============================================================================
// Author Repository Implementation
// ============================================================================

impl AuthorRepository for PgFeedRepository {
    async fn find_author(&self, account_id: AccountId) -> FeedResult<Option<Author>> {
        let row = sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT id, account_name, authority, del_flg, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AuthorRow::into_author))
    }

    async fn find_active_author_by_name(&self, account_name: &str) -> FeedResult<Option<Author>> {
        let row = sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT id, account_name, authority, del_flg, created_at
            FROM accounts
            WHERE account_name = $1 AND del_flg = FALSE
            "#,
        )
        .bind(account_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AuthorRow::into_author))
    }

    async fn account_stats(&self, account_id: AccountId) -> FeedResult<AccountStats> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM posts WHERE account_id = $1) AS post_count,
                (SELECT COUNT(*) FROM comments WHERE account_id = $1) AS comment_count,
                (SELECT COUNT(*) FROM comments c
                    JOIN posts p ON p.id = c.post_id
                    WHERE p.account_id = $1) AS commented_count
            "#,
        )
        .bind(account_id.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(AccountStats {
            post_count: row.post_count,
            comment_count: row.comment_count,
            commented_count: row.commented_count,
        })
    }
}

// ============================================================================
// Row Types
// ============================================================================

fn parse_mime(raw: &str) -> FeedResult<ImageMime> {
    ImageMime::from_mime(raw).ok_or_else(|| FeedError::Internal(format!("unknown stored mime {raw:?}")))
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    account_id: i64,
    body: String,
    mime: String,
    created_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> FeedResult<Post> {
        Ok(Post {
            id: PostId::new(self.id),
            account_id: AccountId::new(self.account_id),
            body: self.body,
            mime: parse_mime(&self.mime)?,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PostWithAuthorRow {
    #[sqlx(flatten)]
    post: PostRow,
    author_name: String,
    author_authority: i16,
    author_del_flg: bool,
    author_created_at: DateTime<Utc>,
}

impl PostWithAuthorRow {
    fn into_domain(self) -> FeedResult<PostWithAuthor> {
        let author = Author {
            id: AccountId::new(self.post.account_id),
            account_name: self.author_name,
            authority: Authority::from_level(self.author_authority),
            del_flg: self.author_del_flg,
            created_at: self.author_created_at,
        };
        Ok(PostWithAuthor {
            post: self.post.into_post()?,
            author,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: i64,
    mime: String,
    imgdata: Vec<u8>,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    account_id: i64,
    comment: String,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: CommentId::new(self.id),
            post_id: PostId::new(self.post_id),
            account_id: AccountId::new(self.account_id),
            comment: self.comment,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentWithAuthorRow {
    #[sqlx(flatten)]
    comment: CommentRow,
    author_name: String,
    author_authority: i16,
    author_del_flg: bool,
    author_created_at: DateTime<Utc>,
}

impl CommentWithAuthorRow {
    fn into_view(self) -> CommentView {
        let user = Author {
            id: AccountId::new(self.comment.account_id),
            account_name: self.author_name,
            authority: Authority::from_level(self.author_authority),
            del_flg: self.author_del_flg,
            created_at: self.author_created_at,
        };
        CommentView::new(self.comment.into_comment(), user)
    }
}

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: i64,
    account_name: String,
    authority: i16,
    del_flg: bool,
    created_at: DateTime<Utc>,
}

impl AuthorRow {
    fn into_author(self) -> Author {
        Author {
            id: AccountId::new(self.id),
            account_name: self.account_name,
            authority: Authority::from_level(self.authority),
            del_flg: self.del_flg,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    post_count: i64,
    comment_count: i64,
    commented_count: i64,
}
