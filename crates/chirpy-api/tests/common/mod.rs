#![allow(dead_code)]

use std::fs;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, Response, header};
use chirpy_api::router::router;
use chirpy_api::state::{AppState, AppStateInner};
use chirpy_db::Database;
use chrono::Duration;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

/// A router over a throwaway store and file root. Keep `dir` alive for the
/// duration of the test.
pub struct TestApp {
    pub dir: TempDir,
    pub state: AppState,
    pub app: Router,
}

pub fn build_test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("database.json")).unwrap();

    let file_root = dir.path().join("public");
    fs::create_dir_all(&file_root).unwrap();
    fs::write(file_root.join("index.html"), "<h1>Welcome to Chirpy</h1>").unwrap();

    let state = AppStateInner::new(
        db,
        JWT_SECRET.to_string(),
        POLKA_KEY.to_string(),
        Duration::hours(1),
    );
    let app = router(state.clone(), &file_root);

    TestApp { dir, state, app }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Send a body verbatim, for payloads that are not valid JSON.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    content_type: Option<&str>,
    body: &str,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Create a user and log in, returning `(user_id, access_token, refresh_token)`.
pub async fn signup_and_login(app: &Router, email: &str, password: &str) -> (u64, String, String) {
    let credentials = serde_json::json!({ "email": email, "password": password });

    let response = send(app, Method::POST, "/api/users", None, Some(credentials.clone())).await;
    assert_eq!(response.status(), 201);

    let response = send(app, Method::POST, "/api/login", None, Some(credentials)).await;
    assert_eq!(response.status(), 200);
    let json = body_json(response).await;

    (
        json["id"].as_u64().unwrap(),
        json["token"].as_str().unwrap().to_string(),
        json["refresh_token"].as_str().unwrap().to_string(),
    )
}
