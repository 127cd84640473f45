use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Deserializer};
use service_core::error::AppError;
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

use crate::{
    dtos::ErrorResponse, middleware::AuthUser, models::UserResponse, services::ServiceError,
    AppState,
};

/// Distinguishes an absent field from an explicit null: absent leaves
/// the display name unchanged, null clears it.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(example = "Jane Doe")]
    pub display_name: Option<Option<String>>,
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/v1/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .store
        .find_user_by_id(user.user_id)
        .await?
        .ok_or(ServiceError::UserNotFound)?;

    Ok(Json(user.sanitized()))
}

/// Update the authenticated user's profile
#[utoipa::path(
    patch,
    path = "/v1/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 401, description = "Missing or invalid access token", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Some(display_name) = req.display_name else {
        // Nothing to change, return the current profile.
        let current = state
            .store
            .find_user_by_id(user.user_id)
            .await?
            .ok_or(ServiceError::UserNotFound)?;
        return Ok(Json(current.sanitized()));
    };

    if let Some(name) = &display_name {
        if name.chars().count() > 120 {
            let mut errors = ValidationErrors::new();
            let mut error = ValidationError::new("length");
            error.message = Some("Display name must be at most 120 characters".into());
            errors.add("display_name", error);
            return Err(AppError::ValidationError(errors));
        }
    }

    let updated = state
        .store
        .update_display_name(user.user_id, display_name)
        .await?
        .ok_or(ServiceError::UserNotFound)?;

    Ok(Json(updated.sanitized()))
}
