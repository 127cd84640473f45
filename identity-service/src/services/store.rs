use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Session, User};
use crate::services::ServiceError;

/// Persistence operations for users and sessions.
///
/// The auth service and handlers depend on this trait; production wires
/// in the Postgres-backed [`Database`](crate::services::Database),
/// tests wire in [`MemoryStore`].
#[async_trait]
pub trait AuthStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;
    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, ServiceError>;
    /// Insert a new user. Fails with [`ServiceError::UniqueViolation`]
    /// when the email is already taken.
    async fn insert_user(&self, user: &User) -> Result<(), ServiceError>;
    async fn update_last_login(&self, user_id: Uuid) -> Result<(), ServiceError>;
    async fn update_display_name(
        &self,
        user_id: Uuid,
        display_name: Option<String>,
    ) -> Result<Option<User>, ServiceError>;

    async fn insert_session(&self, session: &Session) -> Result<(), ServiceError>;
    async fn find_session_by_id(&self, session_id: Uuid) -> Result<Option<Session>, ServiceError>;
    /// Swap the stored fingerprint only if `old_fingerprint` still
    /// matches and the session is not revoked. Returns whether a row
    /// changed; false means a concurrent caller rotated or revoked
    /// first.
    async fn rotate_session(
        &self,
        session_id: Uuid,
        old_fingerprint: &str,
        new_fingerprint: &str,
        new_expires_at: DateTime<Utc>,
    ) -> Result<bool, ServiceError>;
    /// Revoke a session. A second call on the same session keeps the
    /// original `revoked_at`, and unknown sessions are a no-op.
    async fn revoke_session(&self, session_id: Uuid) -> Result<(), ServiceError>;

    async fn health_check(&self) -> Result<(), ServiceError>;
}

/// In-memory store for tests.
pub struct MemoryStore {
    pub users: std::sync::Mutex<std::collections::HashMap<Uuid, User>>,
    pub sessions: std::sync::Mutex<std::collections::HashMap<Uuid, Session>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: std::sync::Mutex::new(std::collections::HashMap::new()),
            sessions: std::sync::Mutex::new(std::collections::HashMap::new()),
        }
    }

    fn lock_users(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, std::collections::HashMap<Uuid, User>>, ServiceError>
    {
        self.users
            .lock()
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("users mutex poisoned: {}", e)))
    }

    fn lock_sessions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, std::collections::HashMap<Uuid, Session>>, ServiceError>
    {
        self.sessions
            .lock()
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("sessions mutex poisoned: {}", e)))
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let users = self.lock_users()?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, ServiceError> {
        let users = self.lock_users()?;
        Ok(users.get(&user_id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), ServiceError> {
        let mut users = self.lock_users()?;
        if users.values().any(|u| u.email == user.email) {
            return Err(ServiceError::UniqueViolation);
        }
        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn update_last_login(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let mut users = self.lock_users()?;
        if let Some(user) = users.get_mut(&user_id) {
            let now = Utc::now();
            user.last_login_at = Some(now);
            user.updated_at = now;
        }
        Ok(())
    }

    async fn update_display_name(
        &self,
        user_id: Uuid,
        display_name: Option<String>,
    ) -> Result<Option<User>, ServiceError> {
        let mut users = self.lock_users()?;
        Ok(users.get_mut(&user_id).map(|user| {
            user.display_name = display_name;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn insert_session(&self, session: &Session) -> Result<(), ServiceError> {
        let mut sessions = self.lock_sessions()?;
        sessions.insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_session_by_id(&self, session_id: Uuid) -> Result<Option<Session>, ServiceError> {
        let sessions = self.lock_sessions()?;
        Ok(sessions.get(&session_id).cloned())
    }

    async fn rotate_session(
        &self,
        session_id: Uuid,
        old_fingerprint: &str,
        new_fingerprint: &str,
        new_expires_at: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        let mut sessions = self.lock_sessions()?;
        match sessions.get_mut(&session_id) {
            Some(session)
                if session.revoked_at.is_none() && session.refresh_hash == old_fingerprint =>
            {
                session.refresh_hash = new_fingerprint.to_string();
                session.expires_at = new_expires_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_session(&self, session_id: Uuid) -> Result<(), ServiceError> {
        let mut sessions = self.lock_sessions()?;
        if let Some(session) = sessions.get_mut(&session_id) {
            if session.revoked_at.is_none() {
                session.revoked_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}
