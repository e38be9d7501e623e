#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use hookhub_api::config::{LogFormat, ServerConfig};
use hookhub_api::router::build_app_router;
use hookhub_api::state::AppState;
use hookhub_core::signature::{sign, WebhookSecret};

/// Secret configured on the test app.
pub const TEST_SECRET: &str = "test-webhook-secret";

/// Build a test `ServerConfig` with safe defaults and a webhook secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        webhook_secret: WebhookSecret::new(TEST_SECRET),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: 1024 * 1024,
        log_format: LogFormat::Text,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Goes through the same `build_app_router` as `main.rs`, so integration
/// tests exercise the production middleware stack.
pub fn build_test_app(pool: SqlitePool) -> Router {
    build_app_with_config(pool, test_config())
}

/// Build the application with a caller-supplied configuration.
pub fn build_app_with_config(pool: SqlitePool, config: ServerConfig) -> Router {
    let state = AppState::new(pool, &config);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::put(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST raw bytes to `/webhook` with the given event type and signature.
pub async fn post_webhook(
    app: Router,
    event_type: Option<&str>,
    signature: Option<&str>,
    body: &[u8],
) -> Response<Body> {
    let mut builder = Request::post("/webhook")
        .header("content-type", "application/json")
        .header("x-github-delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958");
    if let Some(event_type) = event_type {
        builder = builder.header("x-github-event", event_type);
    }
    if let Some(signature) = signature {
        builder = builder.header("x-hub-signature-256", signature);
    }
    send(app, builder.body(Body::from(body.to_vec())).unwrap()).await
}

/// POST a JSON payload to `/webhook`, signed with [`TEST_SECRET`].
pub async fn post_signed_webhook(
    app: Router,
    event_type: &str,
    payload: serde_json::Value,
) -> Response<Body> {
    let body = payload.to_string().into_bytes();
    let signature = sign(&body, &WebhookSecret::new(TEST_SECRET).unwrap());
    post_webhook(app, Some(event_type), Some(&signature), &body).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Payload fixtures
// ---------------------------------------------------------------------------

/// A push payload for a repository owned by an organization.
pub fn org_push(org: &str, repo: &str) -> serde_json::Value {
    serde_json::json!({
        "ref": "refs/heads/main",
        "repository": {
            "name": repo,
            "full_name": format!("{org}/{repo}"),
            "owner": { "login": org, "type": "Organization" }
        },
        "organization": { "login": org }
    })
}

/// A push payload for a repository owned by a user account.
pub fn user_push(user: &str, repo: &str) -> serde_json::Value {
    serde_json::json!({
        "ref": "refs/heads/main",
        "repository": {
            "name": repo,
            "full_name": format!("{user}/{repo}"),
            "owner": { "login": user, "type": "User" }
        }
    })
}
