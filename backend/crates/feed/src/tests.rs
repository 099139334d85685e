//! Router-level tests for the feed crate

mod router_tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use auth::SessionGate;
    use auth::config::AuthConfig;
    use auth::domain::repository::AccountRepository;
    use auth::infra::memory::InMemoryAuthRepository;
    use auth::presentation::AuthAppState;
    use auth::presentation::router::auth_router_generic;
    use auth::with_session_context;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use kernel::id::AccountId;
    use platform::cache::{AnyObjectCache, MemoryObjectCache};
    use tower::ServiceExt;

    use crate::application::config::FeedConfig;
    use crate::application::create_post::UploadRejection;
    use crate::infra::memory::InMemoryFeedRepository;
    use crate::presentation::router::feed_router_generic;

    const BOUNDARY: &str = "feedtestboundary";

    struct TestApp {
        router: Router,
        accounts: InMemoryAuthRepository,
        public_dir: PathBuf,
    }

    impl TestApp {
        fn new(name: &str) -> Self {
            let public_dir =
                std::env::temp_dir().join(format!("feed-router-{name}-{}", std::process::id()));
            let _ = std::fs::remove_dir_all(&public_dir);
            std::fs::create_dir_all(&public_dir).unwrap();

            let accounts = InMemoryAuthRepository::default();
            let auth_config = AuthConfig::development();
            let feed_config = FeedConfig {
                public_dir: public_dir.clone(),
                ..FeedConfig::default()
            };

            let sessions = SessionGate::new(Arc::new(accounts.clone()), Arc::new(auth_config.clone()));
            let cache = AnyObjectCache::Memory(MemoryObjectCache::new(&feed_config.cache_config()));

            let router = auth_router_generic(accounts.clone(), auth_config.clone()).merge(
                feed_router_generic(
                    InMemoryFeedRepository::new(accounts.clone()),
                    sessions,
                    cache,
                    feed_config,
                ),
            );
            let router = with_session_context(router, AuthAppState::new(accounts.clone(), auth_config));

            Self {
                router,
                accounts,
                public_dir,
            }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        /// Register and return the session cookie pair
        async fn register(&self, name: &str) -> String {
            let response = self
                .send(form(
                    "/register",
                    &format!("account_name={name}&password={name}{name}"),
                    None,
                ))
                .await;
            assert_eq!(response.status(), StatusCode::FOUND);
            cookie_pair(&response)
        }

        async fn csrf_token(&self, cookie: &str) -> String {
            let page = json(self.send(get("/", Some(cookie))).await).await;
            page["csrf_token"].as_str().unwrap().to_string()
        }

        fn public_path(&self, relative: &str) -> PathBuf {
            self.public_dir.join(relative)
        }
    }

    impl Drop for TestApp {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.public_dir);
        }
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder =
            Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn upload(csrf: &str, file: Option<(&str, &[u8])>, cookie: Option<&str>) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in [("csrf_token", csrf), ("body", "sunset")] {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((content_type, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::post("/").header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn cookie_pair(response: &Response) -> String {
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    async fn json(response: Response) -> serde_json::Value {
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

    async fn post_image(app: &TestApp, cookie: &str) -> String {
        let csrf = app.csrf_token(cookie).await;
        let response = app
            .send(upload(&csrf, Some(("image/png", PNG)), Some(cookie)))
            .await;
        assert_eq!(response.status(), StatusCode::FOUND);
        location(&response).to_string()
    }

    #[tokio::test]
    async fn test_anonymous_home() {
        let app = TestApp::new("anon-home");

        let page = json(app.send(get("/", None)).await).await;

        assert!(page["me"].is_null());
        assert_eq!(page["posts"].as_array().unwrap().len(), 0);
        assert_eq!(page["csrf_token"], "");
    }

    #[tokio::test]
    async fn test_upload_then_view_and_serve_image() {
        let app = TestApp::new("upload");
        let cookie = app.register("mary").await;

        let location = post_image(&app, &cookie).await;
        assert_eq!(location, "/posts/1");

        let page = json(app.send(get("/posts/1", Some(&cookie))).await).await;
        assert_eq!(page["post"]["body"], "sunset");
        assert_eq!(page["post"]["image_url"], "/image/1.png");
        assert_eq!(page["post"]["user"]["account_name"], "mary");
        assert_eq!(page["me"]["account_name"], "mary");

        let image = app.send(get("/image/1.png", None)).await;
        assert_eq!(image.status(), StatusCode::OK);
        assert_eq!(image.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(body_bytes(image).await, PNG);

        // Mirrored to the static tree on upload
        assert_eq!(std::fs::read(app.public_path("image/1.png")).unwrap(), PNG);
    }

    #[tokio::test]
    async fn test_image_extension_mismatch_is_404() {
        let app = TestApp::new("image-mismatch");
        let cookie = app.register("mary").await;
        post_image(&app, &cookie).await;

        for uri in ["/image/1.jpg", "/image/1", "/image/abc.png", "/image/9.png"] {
            let response = app.send(get(uri, None)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_upload_gate() {
        let app = TestApp::new("upload-gate");

        let anonymous = app.send(upload("", Some(("image/png", PNG)), None)).await;
        assert_eq!(anonymous.status(), StatusCode::FOUND);
        assert_eq!(location(&anonymous), "/login");

        let cookie = app.register("mary").await;
        let bad_csrf = app
            .send(upload("forged", Some(("image/png", PNG)), Some(&cookie)))
            .await;
        assert_eq!(bad_csrf.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let csrf = app.csrf_token(&cookie).await;
        let unsupported = app
            .send(upload(&csrf, Some(("image/webp", PNG)), Some(&cookie)))
            .await;
        assert_eq!(unsupported.status(), StatusCode::FOUND);
        assert_eq!(location(&unsupported), "/");

        let page = json(app.send(get("/", Some(&cookie))).await).await;
        assert_eq!(page["flash"], UploadRejection::UnsupportedFormat.notice());
        assert_eq!(page["posts"].as_array().unwrap().len(), 0);

        let missing = app.send(upload(&csrf, None, Some(&cookie))).await;
        assert_eq!(location(&missing), "/");
        let page = json(app.send(get("/", Some(&cookie))).await).await;
        assert_eq!(page["flash"], UploadRejection::ImageRequired.notice());
    }

    #[tokio::test]
    async fn test_comment_flow() {
        let app = TestApp::new("comment");
        let cookie = app.register("mary").await;
        post_image(&app, &cookie).await;
        let csrf = app.csrf_token(&cookie).await;

        let response = app
            .send(form(
                "/comment",
                &format!("post_id=1&comment=lovely&csrf_token={csrf}"),
                Some(&cookie),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/posts/1");

        let page = json(app.send(get("/posts/1", None)).await).await;
        assert_eq!(page["post"]["comment_count"], 1);
        assert_eq!(page["post"]["comments"][0]["comment"], "lovely");
        assert_eq!(page["post"]["comments"][0]["user"]["account_name"], "mary");

        let bad_id = app
            .send(form(
                "/comment",
                &format!("post_id=abc&comment=x&csrf_token={csrf}"),
                Some(&cookie),
            ))
            .await;
        assert_eq!(bad_id.status(), StatusCode::BAD_REQUEST);

        let anonymous = app
            .send(form("/comment", "post_id=1&comment=x&csrf_token=", None))
            .await;
        assert_eq!(anonymous.status(), StatusCode::FOUND);
        assert_eq!(location(&anonymous), "/login");
    }

    #[tokio::test]
    async fn test_posts_cursor() {
        let app = TestApp::new("cursor");
        let cookie = app.register("mary").await;
        post_image(&app, &cookie).await;

        let empty = app.send(get("/posts", None)).await;
        assert_eq!(empty.status(), StatusCode::OK);
        assert!(body_bytes(empty).await.is_empty());

        let garbage = app.send(get("/posts?max_created_at=yesterday", None)).await;
        assert_eq!(garbage.status(), StatusCode::BAD_REQUEST);

        let ancient = app
            .send(get("/posts?max_created_at=2000-01-01T00:00:00%2B00:00", None))
            .await;
        assert_eq!(ancient.status(), StatusCode::NOT_FOUND);

        let future = app
            .send(get("/posts?max_created_at=2100-01-01T00:00:00%2B09:00", None))
            .await;
        let posts = json(future).await;
        assert_eq!(posts.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_account_page_and_static_fallthrough() {
        let app = TestApp::new("account");
        let cookie = app.register("mary").await;
        post_image(&app, &cookie).await;
        std::fs::write(app.public_path("robots.txt"), "User-agent: *").unwrap();

        let page = json(app.send(get("/@mary", None)).await).await;
        assert_eq!(page["user"]["account_name"], "mary");
        assert_eq!(page["post_count"], 1);
        assert_eq!(page["comment_count"], 0);
        assert_eq!(page["commented_count"], 0);
        assert_eq!(page["posts"].as_array().unwrap().len(), 1);

        let unknown = app.send(get("/@nobody", None)).await;
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let robots = app.send(get("/robots.txt", None)).await;
        assert_eq!(robots.status(), StatusCode::OK);
        assert_eq!(body_bytes(robots).await, b"User-agent: *");
    }

    #[tokio::test]
    async fn test_banned_author_disappears() {
        let app = TestApp::new("banned");
        let cookie = app.register("mary").await;
        post_image(&app, &cookie).await;

        app.accounts.ban_account(AccountId::new(1)).await.unwrap();

        assert_eq!(app.send(get("/posts/1", None)).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.send(get("/@mary", None)).await.status(), StatusCode::NOT_FOUND);

        // The banned session resolves as anonymous
        let page = json(app.send(get("/", Some(&cookie))).await).await;
        assert!(page["me"].is_null());
    }
}
