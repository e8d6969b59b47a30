//! Integration tests for Copper Lily.
//!
//! # Scope
//!
//! These tests drive the real router in-process with `tower::ServiceExt`.
//! They cover everything the API decides *before* its first database call:
//! the auth gate, boundary validation, and wire shapes. Workflow tests that
//! need live data (stock decrements, promo redemption) run against a real
//! `PostgreSQL` via the CLI migrations and are exercised in staging.
//!
//! The pool behind the test state is created lazily and never connects.

use std::net::IpAddr;
use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use chrono::Duration;
use secrecy::SecretString;

use copper_lily_api::config::ApiConfig;
use copper_lily_api::db::create_lazy_pool;
use copper_lily_api::routes;
use copper_lily_api::services::auth::TokenVerifier;
use copper_lily_api::state::AppState;
use copper_lily_core::{UserId, UserRole};

/// Signing secret shared by the test state and the minted credentials.
pub const TEST_TOKEN_SECRET: &str = "kR8!vm2Qx9#Lp4@Wc7$Tz0&Jh5^Bn3*Dq";

/// Build an `AppState` over a lazily-connected pool.
///
/// # Panics
///
/// Panics if the fixed test configuration is invalid.
#[must_use]
pub fn test_state() -> AppState {
    let config = ApiConfig {
        database_url: SecretString::from("postgres://localhost:1/copper_lily_test"),
        host: "127.0.0.1".parse::<IpAddr>().expect("valid address"),
        port: 0,
        token_secret: SecretString::from(TEST_TOKEN_SECRET),
        allowed_origins: vec!["http://localhost:3000".to_string()],
        upload_dir: PathBuf::from("uploads"),
        sentry_dsn: None,
        sentry_environment: None,
    };
    let pool = create_lazy_pool(&config.database_url).expect("lazy pool");
    AppState::new(config, pool)
}

/// The full API router over the test state.
#[must_use]
pub fn test_app() -> Router {
    routes::routes().with_state(test_state())
}

/// Mint a bearer credential the test state will accept.
#[must_use]
pub fn bearer(user_id: i32, role: UserRole) -> String {
    let verifier = TokenVerifier::new(SecretString::from(TEST_TOKEN_SECRET));
    let token = verifier.issue(UserId::new(user_id), role, Duration::hours(1));
    format!("Bearer {token}")
}

/// Mint an already-expired credential.
#[must_use]
pub fn expired_bearer(user_id: i32, role: UserRole) -> String {
    let verifier = TokenVerifier::new(SecretString::from(TEST_TOKEN_SECRET));
    let token = verifier.issue(UserId::new(user_id), role, Duration::hours(-1));
    format!("Bearer {token}")
}

/// Build a JSON request.
///
/// # Panics
///
/// Panics if the request cannot be constructed.
#[must_use]
pub fn json_request(
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Build a bodyless request.
///
/// # Panics
///
/// Panics if the request cannot be constructed.
#[must_use]
pub fn bare_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).expect("valid request")
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not valid JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("JSON body")
}
