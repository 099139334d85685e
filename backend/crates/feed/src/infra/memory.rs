//! In-Memory Repository
//!
//! Backs use-case and router tests without a database. Accounts live in an
//! [`InMemoryAuthRepository`] so bans made through the auth side are seen
//! by the feed.

use std::sync::{Arc, Mutex, PoisonError};

use auth::domain::repository::AccountRepository;
use auth::infra::memory::InMemoryAuthRepository;
use auth::models::{AccountName, NewAccount};
use chrono::{DateTime, Duration, TimeZone, Utc};
use kernel::id::{AccountId, CommentId, PostId};

use crate::domain::entities::{
    AccountStats, Author, Comment, CommentView, NewComment, NewPost, Post, PostImage, PostWithAuthor,
};
use crate::domain::repository::{AuthorRepository, CommentRepository, PostRepository};
use crate::domain::value_objects::{FeedQuery, ImageMime};
use crate::error::{FeedError, FeedResult};

#[derive(Clone)]
struct StoredPost {
    post: Post,
    imgdata: Vec<u8>,
}

#[derive(Default)]
struct State {
    posts: Vec<StoredPost>,
    comments: Vec<Comment>,
    ticks: i64,
}

impl State {
    /// Deterministic clock, one second per write
    fn tick(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default();
        epoch + Duration::seconds(self.ticks)
    }

    fn insert_post(&mut self, post: &NewPost, created_at: DateTime<Utc>) -> PostId {
        let id = PostId::new(self.posts.len() as i64 + 1);
        self.posts.push(StoredPost {
            post: Post {
                id,
                account_id: post.account_id,
                body: post.body.clone(),
                mime: post.mime,
                created_at,
            },
            imgdata: post.imgdata.clone(),
        });
        id
    }

    fn insert_comment(&mut self, comment: &NewComment, created_at: DateTime<Utc>) -> CommentId {
        let id = CommentId::new(self.comments.len() as i64 + 1);
        self.comments.push(Comment {
            id,
            post_id: comment.post_id,
            account_id: comment.account_id,
            comment: comment.comment.clone(),
            created_at,
        });
        id
    }

    fn matching_posts(&self, query: &FeedQuery) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .map(|stored| stored.post.clone())
            .filter(|post| query.account_id().is_none_or(|id| post.account_id == id))
            .filter(|post| query.max_created_at().is_none_or(|at| post.created_at <= at))
            .filter(|post| query.post_id().is_none_or(|id| post.id == id))
            .collect();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        posts
    }

    fn post_comments(&self, post_id: PostId, limit: Option<usize>) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        if let Some(limit) = limit {
            comments.truncate(limit);
        }
        comments
    }
}

/// In-memory feed repository
#[derive(Clone, Default)]
pub struct InMemoryFeedRepository {
    accounts: InMemoryAuthRepository,
    state: Arc<Mutex<State>>,
}

impl InMemoryFeedRepository {
    pub fn new(accounts: InMemoryAuthRepository) -> Self {
        Self {
            accounts,
            state: Arc::default(),
        }
    }

    pub fn accounts(&self) -> &InMemoryAuthRepository {
        &self.accounts
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    // ------------------------------------------------------------------------
    // Fixture helpers
    // ------------------------------------------------------------------------

    pub async fn add_account(&self, account_name: &str) -> AccountId {
        let name = AccountName::new(account_name).expect("valid fixture account name");
        self.accounts
            .create_account(&NewAccount::new(name, "password"))
            .await
            .expect("in-memory insert")
    }

    pub async fn ban(&self, account_id: AccountId) {
        self.accounts
            .ban_account(account_id)
            .await
            .expect("in-memory update");
    }

    pub fn add_post(&self, account_id: AccountId) -> PostId {
        self.with_state(|state| {
            let at = state.tick();
            state.insert_post(&fixture_post(account_id), at)
        })
    }

    pub fn add_post_at(&self, account_id: AccountId, created_at: DateTime<Utc>) -> PostId {
        self.with_state(|state| state.insert_post(&fixture_post(account_id), created_at))
    }

    pub fn add_comment(&self, post_id: PostId, account_id: AccountId, text: &str) -> CommentId {
        self.with_state(|state| {
            let at = state.tick();
            state.insert_comment(&fixture_comment(post_id, account_id, text), at)
        })
    }

    pub fn add_comment_at(
        &self,
        post_id: PostId,
        account_id: AccountId,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> CommentId {
        self.with_state(|state| {
            state.insert_comment(&fixture_comment(post_id, account_id, text), created_at)
        })
    }

    async fn author_of(&self, account_id: AccountId) -> FeedResult<Author> {
        self.find_author(account_id)
            .await?
            .ok_or_else(|| FeedError::Internal(format!("account {account_id} missing")))
    }
}

fn fixture_post(account_id: AccountId) -> NewPost {
    NewPost {
        account_id,
        mime: ImageMime::Png,
        imgdata: b"\x89PNG fixture".to_vec(),
        body: "fixture".to_string(),
    }
}

fn fixture_comment(post_id: PostId, account_id: AccountId, text: &str) -> NewComment {
    NewComment {
        post_id,
        account_id,
        comment: text.to_string(),
    }
}

impl PostRepository for InMemoryFeedRepository {
    async fn find_posts_with_authors(
        &self,
        query: &FeedQuery,
        limit: usize,
    ) -> FeedResult<Vec<PostWithAuthor>> {
        let posts = self.with_state(|state| state.matching_posts(query));

        let mut rows = Vec::new();
        for post in posts {
            if rows.len() >= limit {
                break;
            }
            let author = self.author_of(post.account_id).await?;
            if !author.is_banned() {
                rows.push(PostWithAuthor { post, author });
            }
        }
        Ok(rows)
    }

    async fn find_posts(&self, query: &FeedQuery) -> FeedResult<Vec<Post>> {
        Ok(self.with_state(|state| state.matching_posts(query)))
    }

    async fn find_post(&self, post_id: PostId) -> FeedResult<Option<Post>> {
        Ok(self.with_state(|state| {
            state
                .posts
                .iter()
                .find(|stored| stored.post.id == post_id)
                .map(|stored| stored.post.clone())
        }))
    }

    async fn find_image(&self, post_id: PostId) -> FeedResult<Option<PostImage>> {
        Ok(self.with_state(|state| {
            state
                .posts
                .iter()
                .find(|stored| stored.post.id == post_id)
                .map(|stored| PostImage {
                    post_id,
                    mime: stored.post.mime,
                    imgdata: stored.imgdata.clone(),
                })
        }))
    }

    async fn create_post(&self, post: &NewPost) -> FeedResult<PostId> {
        Ok(self.with_state(|state| {
            let at = state.tick();
            state.insert_post(post, at)
        }))
    }
}

impl CommentRepository for InMemoryFeedRepository {
    async fn count_comments(&self, post_id: PostId) -> FeedResult<i64> {
        Ok(self.with_state(|state| {
            state.comments.iter().filter(|c| c.post_id == post_id).count() as i64
        }))
    }

    async fn find_comments_with_authors(
        &self,
        post_id: PostId,
        limit: Option<usize>,
    ) -> FeedResult<Vec<CommentView>> {
        let comments = self.with_state(|state| state.post_comments(post_id, limit));

        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            let user = self.author_of(comment.account_id).await?;
            views.push(CommentView::new(comment, user));
        }
        Ok(views)
    }

    async fn find_comments(&self, post_id: PostId, limit: Option<usize>) -> FeedResult<Vec<Comment>> {
        Ok(self.with_state(|state| state.post_comments(post_id, limit)))
    }

    async fn create_comment(&self, comment: &NewComment) -> FeedResult<CommentId> {
        Ok(self.with_state(|state| {
            let at = state.tick();
            state.insert_comment(comment, at)
        }))
    }
}

impl AuthorRepository for InMemoryFeedRepository {
    async fn find_author(&self, account_id: AccountId) -> FeedResult<Option<Author>> {
        let account = self.accounts.find_account(account_id).await?;
        Ok(account.as_ref().map(Author::from))
    }

    async fn find_active_author_by_name(&self, account_name: &str) -> FeedResult<Option<Author>> {
        let name = AccountName::from_stored(account_name.to_string());
        let account = self.accounts.find_active_by_name(&name).await?;
        Ok(account.as_ref().map(Author::from))
    }

    async fn account_stats(&self, account_id: AccountId) -> FeedResult<AccountStats> {
        Ok(self.with_state(|state| {
            let own_posts: Vec<PostId> = state
                .posts
                .iter()
                .filter(|stored| stored.post.account_id == account_id)
                .map(|stored| stored.post.id)
                .collect();

            AccountStats {
                post_count: own_posts.len() as i64,
                comment_count: state
                    .comments
                    .iter()
                    .filter(|c| c.account_id == account_id)
                    .count() as i64,
                commented_count: state
                    .comments
                    .iter()
                    .filter(|c| own_posts.contains(&c.post_id))
                    .count() as i64,
            }
        }))
    }
}
