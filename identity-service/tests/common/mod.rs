//! Test helper module for identity-service integration tests.
//!
//! Builds the full router against the in-memory store so the HTTP
//! surface can be exercised without PostgreSQL.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use identity_service::{
    config::{DatabaseConfig, Environment, IdentityConfig, SecurityConfig, TokenConfig},
    services::{AuthService, JwtService, MemoryStore},
    AppState,
};
use std::sync::Arc;
use tower::util::ServiceExt;

/// Test application backed by the in-memory store.
pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub signer: Arc<JwtService>,
}

impl TestApp {
    pub fn spawn() -> Self {
        let config = create_test_config();
        let store = Arc::new(MemoryStore::default());
        let signer = Arc::new(JwtService::new(&config.tokens));

        let auth = AuthService::new(
            store.clone(),
            signer.clone(),
            config.tokens.refresh_token_ttl_days,
        );

        let state = AppState {
            config,
            store: store.clone(),
            signer: signer.clone(),
            auth,
        };

        TestApp {
            app: identity_service::build_router(state),
            store,
            signer,
        }
    }
}

/// Create a test configuration.
pub fn create_test_config() -> IdentityConfig {
    IdentityConfig {
        common: service_core::config::Config { port: 0 },
        environment: Environment::Dev,
        service_name: "identity-service-test".to_string(),
        service_version: "0.1.0".to_string(),
        log_level: "debug".to_string(),
        database: DatabaseConfig {
            url: "postgres://unused-in-tests".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        tokens: TokenConfig {
            access_secret: "test_access_secret".to_string(),
            access_token_ttl_minutes: 15,
            refresh_token_ttl_days: 30,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    }
}

/// Issue a JSON request against the router and return status plus parsed body.
/// Empty response bodies come back as `Value::Null`.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, None, Some(body)).await
}

/// Register a user and return the token response body.
pub async fn register(app: &Router, email: &str, password: &str) -> serde_json::Value {
    let (status, body) = post_json(
        app,
        "/v1/auth/register",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}
