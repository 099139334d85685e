//! HTTP Handlers

use std::sync::Arc;

use auth::models::AccountView;
use auth::response::{flash_redirect, found};
use auth::{AuthStore, SessionContext, SessionGate};
use axum::Json;
use axum::body::Body;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Extension, Form, Multipart, Path, Query, Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::id::PostId;
use platform::cache::AnyObjectCache;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::application::config::FeedConfig;
use crate::application::snapshot::SnapshotCache;
use crate::application::{
    AccountPageUseCase, CreateCommentInput, CreateCommentUseCase, CreatePostInput,
    CreatePostOutcome, CreatePostUseCase, ServeImageUseCase, TimelineUseCase, UploadedFile,
};
use crate::domain::repository::FeedStore;
use crate::domain::value_objects::parse_cursor;
use crate::error::{FeedError, FeedResult};
use crate::infra::fs_mirror::FsImageMirror;
use crate::presentation::dto::{AccountPageView, CommentForm, IndexView, PostDetailView, PostsQuery};

/// Shared state for feed handlers
#[derive(Clone)]
pub struct FeedAppState<F, R>
where
    F: FeedStore,
    R: AuthStore,
{
    pub repo: Arc<F>,
    pub cache: SnapshotCache<AnyObjectCache>,
    pub mirror: Arc<FsImageMirror>,
    pub config: Arc<FeedConfig>,
    pub sessions: SessionGate<R>,
}

impl<F, R> FeedAppState<F, R>
where
    F: FeedStore,
    R: AuthStore,
{
    pub fn new(repo: F, sessions: SessionGate<R>, cache: AnyObjectCache, config: FeedConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            cache: SnapshotCache::new(cache),
            mirror: Arc::new(FsImageMirror::new(config.image_dir())),
            config: Arc::new(config),
            sessions,
        }
    }

    fn timeline(&self) -> TimelineUseCase<F, AnyObjectCache> {
        TimelineUseCase::new(self.repo.clone(), self.cache.clone(), self.config.clone())
    }
}

fn me_view(ctx: &SessionContext) -> Option<AccountView> {
    ctx.me().map(AccountView::from)
}

// ============================================================================
// Listings
// ============================================================================

/// GET /
pub async fn index<F, R>(
    State(state): State<FeedAppState<F, R>>,
    Extension(ctx): Extension<SessionContext>,
) -> FeedResult<Json<IndexView>>
where
    F: FeedStore,
    R: AuthStore,
{
    let flash = state.sessions.take_flash(&ctx).await;
    let posts = state.timeline().home(&ctx.csrf_token).await?;

    Ok(Json(IndexView {
        me: me_view(&ctx),
        posts,
        csrf_token: ctx.csrf_token.clone(),
        flash,
    }))
}

/// GET /posts?max_created_at=...
pub async fn posts<F, R>(
    State(state): State<FeedAppState<F, R>>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<PostsQuery>,
) -> FeedResult<Response>
where
    F: FeedStore,
    R: AuthStore,
{
    let raw = query.max_created_at.unwrap_or_default();
    if raw.trim().is_empty() {
        return Ok(StatusCode::OK.into_response());
    }

    let cursor = parse_cursor(&raw)?;
    let posts = state.timeline().before(cursor, &ctx.csrf_token).await?;

    Ok(Json(posts).into_response())
}

/// GET /posts/{id}
pub async fn post_detail<F, R>(
    State(state): State<FeedAppState<F, R>>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
) -> FeedResult<Json<PostDetailView>>
where
    F: FeedStore,
    R: AuthStore,
{
    let post_id: PostId = id.parse().map_err(|_| FeedError::NotFound)?;
    let post = state.timeline().post_detail(post_id, &ctx.csrf_token).await?;

    Ok(Json(PostDetailView {
        me: me_view(&ctx),
        post,
    }))
}

/// GET /{handle}
///
/// `@name` is an account page; anything else is a top-level static file.
pub async fn account_or_static<F, R>(
    State(state): State<FeedAppState<F, R>>,
    Extension(ctx): Extension<SessionContext>,
    Path(handle): Path<String>,
    req: Request,
) -> FeedResult<Response>
where
    F: FeedStore,
    R: AuthStore,
{
    let Some(account_name) = handle.strip_prefix('@') else {
        return serve_static(&state.config, req).await;
    };

    let use_case = AccountPageUseCase::new(state.repo.clone(), state.config.clone());
    let page = use_case.execute(account_name, &ctx.csrf_token).await?;

    Ok(Json(AccountPageView::new(me_view(&ctx), page.user, page.posts, page.stats)).into_response())
}

async fn serve_static(config: &FeedConfig, req: Request) -> FeedResult<Response> {
    match ServeDir::new(&config.public_dir).oneshot(req).await {
        Ok(response) => Ok(response.map(Body::new)),
        Err(never) => match never {},
    }
}

// ============================================================================
// Writes
// ============================================================================

/// POST / (multipart: `file`, `body`, `csrf_token`)
pub async fn create_post<F, R>(
    State(state): State<FeedAppState<F, R>>,
    Extension(ctx): Extension<SessionContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> FeedResult<Response>
where
    F: FeedStore,
    R: AuthStore,
{
    // Anonymous uploads are redirected before the body is read
    if !ctx.is_logged_in() {
        return Ok(found("/login"));
    }

    let multipart = multipart.map_err(|e| FeedError::InvalidForm(e.body_text()))?;
    let input = read_upload(multipart).await?;

    let use_case = CreatePostUseCase::new(state.repo.clone(), state.mirror.clone(), state.config.clone());

    match use_case.execute(&ctx, input).await? {
        CreatePostOutcome::Created(post_id) => Ok(found(&format!("/posts/{post_id}"))),
        CreatePostOutcome::Rejected(rejection) => {
            Ok(flash_redirect(&state.sessions, &ctx, rejection.notice(), "/").await?)
        }
    }
}

async fn read_upload(mut multipart: Multipart) -> FeedResult<CreatePostInput> {
    let mut input = CreatePostInput {
        csrf_token: String::new(),
        file: None,
        body: String::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FeedError::InvalidForm(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| FeedError::InvalidForm(e.body_text()))?;
                // Browsers send an empty part when no file was chosen
                if !data.is_empty() {
                    input.file = Some(UploadedFile {
                        content_type,
                        data: data.to_vec(),
                    });
                }
            }
            "body" => {
                input.body = field
                    .text()
                    .await
                    .map_err(|e| FeedError::InvalidForm(e.body_text()))?;
            }
            "csrf_token" => {
                input.csrf_token = field
                    .text()
                    .await
                    .map_err(|e| FeedError::InvalidForm(e.body_text()))?;
            }
            _ => {}
        }
    }

    Ok(input)
}

/// POST /comment
pub async fn create_comment<F, R>(
    State(state): State<FeedAppState<F, R>>,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<CommentForm>,
) -> FeedResult<Response>
where
    F: FeedStore,
    R: AuthStore,
{
    let use_case = CreateCommentUseCase::new(state.repo.clone());

    let post_id = use_case
        .execute(
            &ctx,
            CreateCommentInput {
                post_id: form.post_id,
                comment: form.comment,
                csrf_token: form.csrf_token,
            },
        )
        .await?;

    Ok(found(&format!("/posts/{post_id}")))
}

// ============================================================================
// Images
// ============================================================================

/// GET /image/{id}.{ext}
pub async fn image<F, R>(
    State(state): State<FeedAppState<F, R>>,
    Path(file): Path<String>,
) -> FeedResult<Response>
where
    F: FeedStore,
    R: AuthStore,
{
    let (id, ext) = file.rsplit_once('.').ok_or(FeedError::NotFound)?;
    let post_id: PostId = id.parse().map_err(|_| FeedError::NotFound)?;

    let use_case = ServeImageUseCase::new(state.repo.clone(), state.mirror.clone());
    let image = use_case.execute(post_id, ext).await?;

    Ok((
        [(header::CONTENT_TYPE, HeaderValue::from_static(image.mime.as_str()))],
        image.imgdata,
    )
        .into_response())
}
