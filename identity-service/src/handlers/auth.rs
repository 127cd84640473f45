use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use std::net::SocketAddr;

use crate::{
    dtos::auth::{LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest},
    dtos::ErrorResponse,
    models::{SessionMeta, TokenResponse},
    utils::ValidatedJson,
    AppState,
};

/// Client metadata recorded on the session. ConnectInfo is unavailable
/// when the router is driven without a real socket (as in tests), so
/// the address is optional.
fn session_meta(headers: &HeaderMap, addr: Option<ConnectInfo<SocketAddr>>) -> SessionMeta {
    SessionMeta {
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string()),
        ip_address: addr.map(|ConnectInfo(a)| a.ip().to_string()),
    }
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, session opened", body = TokenResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    addr: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tokens = state.auth.register(req, session_meta(&headers, addr)).await?;

    Ok((StatusCode::CREATED, Json(tokens)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    addr: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tokens = state.auth.login(req, session_meta(&headers, addr)).await?;

    Ok(Json(tokens))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens rotated", body = TokenResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tokens = state.auth.refresh(&req.refresh_token).await?;

    Ok(Json(tokens))
}

/// Revoke the session behind a refresh token
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    request_body = LogoutRequest,
    responses(
        (status = 204, description = "Session revoked (or token was not live)"),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LogoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.logout(&req.refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}
