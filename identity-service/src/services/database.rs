//! PostgreSQL-backed [`AuthStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::models::{Session, User};
use crate::services::{AuthStore, ServiceError};

/// PostgreSQL database wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database wrapper from a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Postgres unique constraint violations come back as SQLSTATE 23505.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[async_trait]
impl AuthStore for Database {
    /// Find user by email. Emails are stored lowercased.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Find user by ID.
    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Insert a new user.
    async fn insert_user(&self, user: &User) -> Result<(), ServiceError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, email, password_hash, display_name, is_active, email_verified, created_at, updated_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(user.is_active)
        .bind(user.email_verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.last_login_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ServiceError::UniqueViolation
            } else {
                ServiceError::Database(e)
            }
        })?;
        Ok(())
    }

    /// Stamp a successful login.
    async fn update_last_login(&self, user_id: Uuid) -> Result<(), ServiceError> {
        sqlx::query("UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Update display name, returning the fresh row.
    async fn update_display_name(
        &self,
        user_id: Uuid,
        display_name: Option<String>,
    ) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET display_name = $2, updated_at = NOW() WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(display_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Insert a new session.
    async fn insert_session(&self, session: &Session) -> Result<(), ServiceError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (session_id, user_id, refresh_hash, expires_at, revoked_at, created_at, user_agent, ip_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id)
        .bind(&session.refresh_hash)
        .bind(session.expires_at)
        .bind(session.revoked_at)
        .bind(session.created_at)
        .bind(&session.user_agent)
        .bind(&session.ip_address)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Find session by ID.
    async fn find_session_by_id(&self, session_id: Uuid) -> Result<Option<Session>, ServiceError> {
        let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(session)
    }

    /// Compare-and-swap the fingerprint. The WHERE clause makes
    /// concurrent rotations of the same token race for a single row
    /// update; losers see zero rows.
    async fn rotate_session(
        &self,
        session_id: Uuid,
        old_fingerprint: &str,
        new_fingerprint: &str,
        new_expires_at: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET refresh_hash = $3, expires_at = $4
            WHERE session_id = $1 AND refresh_hash = $2 AND revoked_at IS NULL
            "#,
        )
        .bind(session_id)
        .bind(old_fingerprint)
        .bind(new_fingerprint)
        .bind(new_expires_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Revoke a session. The revoked_at guard keeps the first
    /// revocation timestamp.
    async fn revoke_session(&self, session_id: Uuid) -> Result<(), ServiceError> {
        sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() WHERE session_id = $1 AND revoked_at IS NULL",
        )
        .bind(session_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Health check - ping the database.
    async fn health_check(&self) -> Result<(), ServiceError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
