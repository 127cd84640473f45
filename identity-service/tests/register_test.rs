//! Registration integration tests for identity-service.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::TestApp;
use identity_service::services::AccessTokenSigner;
use identity_service::utils::{fingerprint, parse_refresh_token};
use tower::util::ServiceExt;

#[tokio::test]
async fn register_returns_created_with_token_pair() {
    let app = TestApp::spawn();

    let (status, body) = common::post_json(
        &app.app,
        "/v1/auth/register",
        serde_json::json!({
            "email": "Alice@Example.com",
            "password": "s3cret-passphrase",
            "display_name": "Alice"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 900);

    // Access token carries the new user's id
    let access_token = body["access_token"].as_str().unwrap();
    let claims = app.signer.validate_access_token(access_token).unwrap();

    let users = app.store.users.lock().unwrap();
    let user = users.values().next().unwrap();
    assert_eq!(claims.sub, user.user_id.to_string());
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.display_name.as_deref(), Some("Alice"));
    assert!(user.is_active);
    drop(users);

    // Refresh token is "{session_id}.{secret}" and only its fingerprint is stored
    let refresh_token = body["refresh_token"].as_str().unwrap();
    let (session_id, secret) = parse_refresh_token(refresh_token).unwrap();

    let sessions = app.store.sessions.lock().unwrap();
    let session = sessions.get(&session_id).unwrap();
    assert_eq!(session.refresh_hash, fingerprint(secret));
    assert_ne!(session.refresh_hash, secret);
    assert!(session.revoked_at.is_none());
}

#[tokio::test]
async fn register_conflicts_on_duplicate_email() {
    let app = TestApp::spawn();

    common::register(&app.app, "bob@example.com", "s3cret-passphrase").await;

    // Same address with different casing still collides
    let (status, body) = common::post_json(
        &app.app,
        "/v1/auth/register",
        serde_json::json!({ "email": "BOB@example.com", "password": "s3cret-passphrase" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email already registered");

    let users = app.store.users.lock().unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn register_rejects_invalid_payloads() {
    let app = TestApp::spawn();

    // Not an email address
    let (status, body) = common::post_json(
        &app.app,
        "/v1/auth/register",
        serde_json::json!({ "email": "not-an-email", "password": "s3cret-passphrase" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Validation error");

    // Password below the minimum length
    let (status, _) = common::post_json(
        &app.app,
        "/v1/auth/register",
        serde_json::json!({ "email": "carol@example.com", "password": "short" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing was persisted
    let users = app.store.users.lock().unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn register_rejects_malformed_json() {
    let app = TestApp::spawn();

    let response = app
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/auth/register")
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
