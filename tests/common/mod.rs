#![allow(dead_code)]

use assessment_backend::{
    app,
    config::{AdminSeed, Config, DEFAULT_MAX_UPLOAD_BYTES},
    database::pool::{create_pool, run_migrations},
    sequencer::TimingConfig,
    AppState,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value as JsonValue;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "Nikadmin26@";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub uploads: TempDir,
}

pub fn test_config(uploads: &TempDir) -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url: "sqlite::memory:".to_string(),
        uploads_dir: uploads.path().to_path_buf(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        sample_cap: 60,
        image_set_size: 11,
        admin: AdminSeed {
            username: "admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        },
        seed_default_content: false,
        legacy_data_dir: None,
        json_logs: false,
        timing: TimingConfig::default(),
    }
}

pub async fn spawn_app() -> TestApp {
    let uploads = tempfile::tempdir().expect("uploads dir");
    let config = test_config(&uploads);

    let pool = create_pool(&config.database_url).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");

    let state = AppState::new(pool, config);
    state
        .user_service
        .ensure_bootstrap_admin(&state.config.admin)
        .await
        .expect("bootstrap admin");

    TestApp {
        router: app(state.clone()),
        state,
        uploads,
    }
}

pub fn basic_auth(identifier: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", identifier, password)))
}

pub fn admin_auth() -> String {
    basic_auth(ADMIN_EMAIL, ADMIN_PASSWORD)
}

pub fn json_request(method: &str, uri: &str, body: &JsonValue, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, JsonValue) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, body)
}
