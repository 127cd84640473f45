use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("email already registered")]
    EmailAlreadyRegistered,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid refresh token")]
    InvalidRefreshToken,

    #[error("user not found")]
    UserNotFound,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ServiceError::UniqueViolation => {
                AppError::Conflict(anyhow::anyhow!("unique constraint violated"))
            }
            ServiceError::EmailAlreadyRegistered => {
                AppError::Conflict(anyhow::anyhow!("email already registered"))
            }
            ServiceError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("invalid credentials"))
            }
            ServiceError::InvalidRefreshToken => {
                AppError::AuthError(anyhow::anyhow!("invalid refresh token"))
            }
            ServiceError::UserNotFound => AppError::NotFound(anyhow::anyhow!("user not found")),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}
