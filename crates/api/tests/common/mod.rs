//! Shared helpers for API integration tests.
//!
//! The app runs the production router over the in-memory store and object
//! store, so these tests need no Postgres or S3.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use backlog_api::auth::jwt::{generate_access_token, JwtConfig};
use backlog_api::config::ServerConfig;
use backlog_api::router::build_app_router;
use backlog_api::state::AppState;
use backlog_core::roles::{ROLE_ADMIN, ROLE_USER};
use backlog_core::types::DbId;
use backlog_db::memory::MemoryStore;
use backlog_storage::memory::MemoryObjectStore;
use backlog_storage::StorageConfig;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const CDN: &str = "https://cdn.example.com";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "api-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
        storage: StorageConfig {
            bucket: "media".to_string(),
            endpoint: None,
            region: "auto".to_string(),
            access_key_id: None,
            secret_access_key: None,
            presign_expiry: Duration::from_secs(900),
            public_url_base: Some(CDN.to_string()),
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub objects: Arc<MemoryObjectStore>,
    config: ServerConfig,
}

impl TestApp {
    /// A fresh router. `Router` is consumed by `oneshot`, so take one per request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn user_token(&self, user_id: DbId) -> String {
        generate_access_token(user_id, ROLE_USER, &self.config.jwt).unwrap()
    }

    pub fn admin_token(&self, user_id: DbId) -> String {
        generate_access_token(user_id, ROLE_ADMIN, &self.config.jwt).unwrap()
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let objects = Arc::new(MemoryObjectStore::with_public_url_base(CDN));
    let state = AppState::new(store.clone(), objects.clone(), config.clone());
    TestApp {
        router: build_app_router(state),
        store,
        objects,
        config,
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Create a project through the API and return its id.
pub async fn create_project(test: &TestApp, token: &str, title: &str) -> DbId {
    let response = post_json_auth(
        test.app(),
        "/api/v1/projects",
        token,
        serde_json::json!({ "title": title }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
