//! Session model - refresh-token sessions with rotating fingerprints.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Client metadata captured when a session is opened.
#[derive(Debug, Clone, Default)]
pub struct SessionMeta {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// Session entity. Stores only the SHA-256 fingerprint of the refresh
/// secret, never the secret itself.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub refresh_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl Session {
    /// Create a new session.
    pub fn new(
        user_id: Uuid,
        refresh_hash: String,
        expires_at: DateTime<Utc>,
        meta: SessionMeta,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user_id,
            refresh_hash,
            expires_at,
            revoked_at: None,
            created_at: Utc::now(),
            user_agent: meta.user_agent,
            ip_address: meta.ip_address,
        }
    }

    /// Check if session is valid (not expired, not revoked).
    pub fn is_valid(&self) -> bool {
        self.revoked_at.is_none() && self.expires_at > Utc::now()
    }

    /// Check if session is expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Check if session is revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Compare a presented fingerprint against the stored one in
    /// constant time.
    pub fn fingerprint_matches(&self, presented: &str) -> bool {
        let stored = self.refresh_hash.as_bytes();
        let presented = presented.as_bytes();
        if stored.len() != presented.len() {
            return false;
        }
        stored.ct_eq(presented).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_session(expires_at: DateTime<Utc>) -> Session {
        Session::new(
            Uuid::new_v4(),
            "fingerprint".to_string(),
            expires_at,
            SessionMeta::default(),
        )
    }

    #[test]
    fn test_session_creation() {
        let session = sample_session(Utc::now() + Duration::days(30));

        assert!(session.is_valid());
        assert!(!session.is_expired());
        assert!(!session.is_revoked());
        assert!(session.user_agent.is_none());
    }

    #[test]
    fn test_session_expiry() {
        let session = sample_session(Utc::now() - Duration::hours(1));

        assert!(session.is_expired());
        assert!(!session.is_valid());
    }

    #[test]
    fn test_session_revocation() {
        let mut session = sample_session(Utc::now() + Duration::days(30));
        session.revoked_at = Some(Utc::now());

        assert!(session.is_revoked());
        assert!(!session.is_valid());
    }

    #[test]
    fn test_fingerprint_comparison() {
        let session = sample_session(Utc::now() + Duration::days(30));

        assert!(session.fingerprint_matches("fingerprint"));
        assert!(!session.fingerprint_matches("fingerprinT"));
        assert!(!session.fingerprint_matches("fingerprint-with-extra"));
        assert!(!session.fingerprint_matches(""));
    }
}
