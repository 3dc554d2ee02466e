#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use pressgrid_api::auth::jwt::{generate_access_token, JwtConfig};
use pressgrid_api::config::ServerConfig;
use pressgrid_api::router::build_app_router;
use pressgrid_api::state::AppState;
use pressgrid_core::category::DeletePolicy;
use pressgrid_core::types::DbId;
use pressgrid_db::repositories::MemoryCategoryStore;
use pressgrid_files::LocalFileStore;
use pressgrid_grid::{GridController, GridSettings};
use tempfile::TempDir;
use tower::ServiceExt;

pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;

/// Smallest byte sequence recognised as a PNG.
pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

const BOUNDARY: &str = "pressgrid-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_dir: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        database_url: None,
        upload_dir: upload_dir.path().to_path_buf(),
        max_upload_bytes: MAX_UPLOAD_BYTES,
        temp_file_max_age_secs: 3600,
        upload_purge_interval_secs: 900,
        grid: GridSettings::default(),
    }
}

/// Application under test: the full router over an in-memory store and a
/// temp-dir file store. Cloning the router shares the same state.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub files: Arc<LocalFileStore>,
    _dir: TempDir,
}

impl TestApp {
    /// Mint a token for `user_id` acting in `tenant_id` with `role`.
    pub fn token(&self, tenant_id: DbId, user_id: DbId, role: &str) -> String {
        generate_access_token(user_id, tenant_id, role, &self.config.jwt).unwrap()
    }

    /// Token for a manager of `tenant_id`.
    pub fn manager(&self, tenant_id: DbId) -> String {
        self.token(tenant_id, 100 + tenant_id, "manager")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn build_test_app() -> TestApp {
    build_test_app_with(DeletePolicy::Reject).await
}

pub async fn build_test_app_with(delete_policy: DeletePolicy) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir);
    config.grid.delete_policy = delete_policy;

    let files = Arc::new(
        LocalFileStore::open(&config.upload_dir, config.max_upload_bytes)
            .await
            .unwrap(),
    );
    let grid = GridController::new(
        Arc::new(MemoryCategoryStore::new()),
        files.clone(),
        config.grid.clone(),
    );
    let state = AppState {
        grid: Arc::new(grid),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        config,
        files,
        _dir: dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

fn authed(method: &str, uri: &str, token: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
}

pub async fn get(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    app.send(authed("GET", uri, token).body(Body::empty()).unwrap())
        .await
}

pub async fn get_with_locale(
    app: &TestApp,
    uri: &str,
    token: &str,
    accept_language: &str,
) -> Response<Body> {
    app.send(
        authed("GET", uri, token)
            .header("accept-language", accept_language)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(
    app: &TestApp,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.send(
        authed("POST", uri, token)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn put_json(
    app: &TestApp,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.send(
        authed("PUT", uri, token)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn delete(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    app.send(authed("DELETE", uri, token).body(Body::empty()).unwrap())
        .await
}

/// POST a multipart body with a single field.
pub async fn upload(
    app: &TestApp,
    token: &str,
    field: &str,
    filename: &str,
    bytes: &[u8],
) -> Response<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    app.send(
        authed("POST", "/api/v1/uploads", token)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a category and return its id.
pub async fn create_category(
    app: &TestApp,
    token: &str,
    title: &str,
    path: &str,
    parent_id: Option<DbId>,
) -> DbId {
    let response = post_json(
        app,
        "/api/v1/categories",
        token,
        serde_json::json!({
            "title": { "en_US": title },
            "path": path,
            "parent_id": parent_id,
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["affected_id"]
        .as_i64()
        .unwrap()
}
