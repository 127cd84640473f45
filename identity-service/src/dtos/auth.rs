use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 320, message = "Email must be at most 320 characters")
    )]
    #[schema(example = "user@example.com")]
    pub email: String,

    #[validate(length(
        min = 8,
        max = 200,
        message = "Password must be between 8 and 200 characters"
    ))]
    #[schema(example = "correct horse battery staple", min_length = 8)]
    pub password: String,

    #[validate(length(max = 120, message = "Display name must be at most 120 characters"))]
    #[schema(example = "Jane Doe")]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,

    #[validate(length(
        min = 1,
        max = 200,
        message = "Password must be between 1 and 200 characters"
    ))]
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 10, message = "Refresh token is required"))]
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000.b64url-secret")]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LogoutRequest {
    #[validate(length(min = 10, message = "Refresh token is required"))]
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000.b64url-secret")]
    pub refresh_token: String,
}
