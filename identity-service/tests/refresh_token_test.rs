//! Refresh token rotation integration tests for identity-service.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use identity_service::services::AccessTokenSigner;
use identity_service::utils::parse_refresh_token;
use uuid::Uuid;

#[tokio::test]
async fn refresh_token_flow() {
    // 1. Register to obtain the initial token pair
    let app = TestApp::spawn();
    let registered = common::register(&app.app, "alice@example.com", "s3cret-passphrase").await;
    let initial_refresh = registered["refresh_token"].as_str().unwrap();

    // 2. Refresh
    let (status, body) = common::post_json(
        &app.app,
        "/v1/auth/refresh",
        serde_json::json!({ "refresh_token": initial_refresh }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let new_access = body["access_token"].as_str().unwrap();
    let new_refresh = body["refresh_token"].as_str().unwrap();

    // 3. Verify the new tokens
    assert!(app.signer.validate_access_token(new_access).is_ok());
    assert_ne!(initial_refresh, new_refresh);

    // 4. The rotated-out token no longer works
    let (status, body) = common::post_json(
        &app.app,
        "/v1/auth/refresh",
        serde_json::json!({ "refresh_token": initial_refresh }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid refresh token");

    // 5. Logout with the current token
    let (status, _) = common::post_json(
        &app.app,
        "/v1/auth/logout",
        serde_json::json!({ "refresh_token": new_refresh }),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // 6. The revoked session refuses further refreshes
    let (status, _) = common::post_json(
        &app.app,
        "/v1/auth/refresh",
        serde_json::json!({ "refresh_token": new_refresh }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rotates_fingerprint_in_place() {
    let app = TestApp::spawn();
    let registered = common::register(&app.app, "bob@example.com", "s3cret-passphrase").await;
    let initial_refresh = registered["refresh_token"].as_str().unwrap();
    let (session_id, _) = parse_refresh_token(initial_refresh).unwrap();

    let old_hash = {
        let sessions = app.store.sessions.lock().unwrap();
        sessions.get(&session_id).unwrap().refresh_hash.clone()
    };

    let (status, body) = common::post_json(
        &app.app,
        "/v1/auth/refresh",
        serde_json::json!({ "refresh_token": initial_refresh }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Same session, new fingerprint
    let (rotated_session, _) =
        parse_refresh_token(body["refresh_token"].as_str().unwrap()).unwrap();
    assert_eq!(rotated_session, session_id);

    let sessions = app.store.sessions.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    let session = sessions.get(&session_id).unwrap();
    assert_ne!(session.refresh_hash, old_hash);
    assert!(session.revoked_at.is_none());
}

#[tokio::test]
async fn refresh_rejects_unknown_and_malformed_tokens() {
    let app = TestApp::spawn();
    common::register(&app.app, "carol@example.com", "s3cret-passphrase").await;

    let bad_tokens = [
        // No separator
        "not-a-valid-token".to_string(),
        // Empty secret half
        format!("{}.", Uuid::new_v4()),
        // Invalid session id half
        "not-a-uuid.c2VjcmV0c2VjcmV0".to_string(),
        // Well-formed but unknown session
        format!("{}.c2VjcmV0c2VjcmV0", Uuid::new_v4()),
    ];

    for token in &bad_tokens {
        let (status, body) = common::post_json(
            &app.app,
            "/v1/auth/refresh",
            serde_json::json!({ "refresh_token": token }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token: {}", token);
        assert_eq!(body["error"], "invalid refresh token", "token: {}", token);
    }

    // Tokens below the minimum length never reach the service
    let (status, _) = common::post_json(
        &app.app,
        "/v1/auth/refresh",
        serde_json::json!({ "refresh_token": "a.b" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn refresh_rejects_wrong_secret_for_live_session() {
    let app = TestApp::spawn();
    let registered = common::register(&app.app, "dave@example.com", "s3cret-passphrase").await;
    let (session_id, _) =
        parse_refresh_token(registered["refresh_token"].as_str().unwrap()).unwrap();

    // Correct session id, forged secret
    let forged = format!("{}.Zm9yZ2VkLXNlY3JldA", session_id);
    let (status, body) = common::post_json(
        &app.app,
        "/v1/auth/refresh",
        serde_json::json!({ "refresh_token": forged }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid refresh token");

    // The session survives untouched
    let sessions = app.store.sessions.lock().unwrap();
    assert!(sessions.get(&session_id).unwrap().revoked_at.is_none());
}

#[tokio::test]
async fn refresh_rejects_expired_session() {
    let app = TestApp::spawn();
    let registered = common::register(&app.app, "erin@example.com", "s3cret-passphrase").await;
    let refresh_token = registered["refresh_token"].as_str().unwrap();
    let (session_id, _) = parse_refresh_token(refresh_token).unwrap();

    // Age the session past its expiry
    {
        let mut sessions = app.store.sessions.lock().unwrap();
        sessions.get_mut(&session_id).unwrap().expires_at =
            chrono::Utc::now() - chrono::Duration::hours(1);
    }

    let (status, body) = common::post_json(
        &app.app,
        "/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh_token }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid refresh token");
}
