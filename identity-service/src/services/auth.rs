//! Credential and session lifecycle flows.
//!
//! This service stays silent about which step of a flow failed: login
//! failures all surface as [`ServiceError::InvalidCredentials`] and
//! refresh failures as [`ServiceError::InvalidRefreshToken`], so the
//! API cannot be used to probe for registered emails or live sessions.

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    dtos::auth::{LoginRequest, RegisterRequest},
    models::{Session, SessionMeta, TokenResponse},
    services::{AccessTokenSigner, AuthStore, ServiceError},
    utils::{
        compose_refresh_token, fingerprint, hash_password, parse_refresh_token, random_secret,
        verify_password, Password, PasswordHashString, REFRESH_SECRET_BYTES,
    },
};

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn AuthStore>,
    signer: Arc<dyn AccessTokenSigner>,
    refresh_token_ttl_days: i64,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn AuthStore>,
        signer: Arc<dyn AccessTokenSigner>,
        refresh_token_ttl_days: i64,
    ) -> Self {
        Self {
            store,
            signer,
            refresh_token_ttl_days,
        }
    }

    /// Register a new account and open its first session.
    pub async fn register(
        &self,
        req: RegisterRequest,
        meta: SessionMeta,
    ) -> Result<TokenResponse, ServiceError> {
        let email = req.email.to_lowercase();

        // Cheap pre-check; the unique index still decides under races.
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::EmailAlreadyRegistered);
        }

        let password_hash = hash_password(&Password::new(req.password))?;

        let user = crate::models::User::new(email, password_hash.into_string(), req.display_name);
        match self.store.insert_user(&user).await {
            Ok(()) => {}
            Err(ServiceError::UniqueViolation) => {
                return Err(ServiceError::EmailAlreadyRegistered)
            }
            Err(e) => return Err(e),
        }

        let refresh_token = self.mint_session(user.user_id, meta).await?;
        self.issue_tokens(user.user_id, refresh_token)
    }

    /// Authenticate with email and password, opening a new session.
    pub async fn login(
        &self,
        req: LoginRequest,
        meta: SessionMeta,
    ) -> Result<TokenResponse, ServiceError> {
        let email = req.email.to_lowercase();

        // Unknown email, wrong password and disabled account all
        // surface as the same error.
        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !user.is_active {
            return Err(ServiceError::InvalidCredentials);
        }

        verify_password(
            &Password::new(req.password),
            &PasswordHashString::new(user.password_hash.clone()),
        )
        .map_err(|_| ServiceError::InvalidCredentials)?;

        self.store.update_last_login(user.user_id).await?;

        let refresh_token = self.mint_session(user.user_id, meta).await?;
        self.issue_tokens(user.user_id, refresh_token)
    }

    /// Exchange a refresh token for a new token pair, rotating the
    /// stored fingerprint. Each token is good for exactly one exchange.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, ServiceError> {
        let (session_id, secret) =
            parse_refresh_token(refresh_token).ok_or(ServiceError::InvalidRefreshToken)?;
        let presented = fingerprint(secret);

        let session = self
            .store
            .find_session_by_id(session_id)
            .await?
            .ok_or(ServiceError::InvalidRefreshToken)?;

        if !session.is_valid() || !session.fingerprint_matches(&presented) {
            return Err(ServiceError::InvalidRefreshToken);
        }

        let new_secret = random_secret(REFRESH_SECRET_BYTES);
        let new_fingerprint = fingerprint(&new_secret);
        let new_expires_at = Utc::now() + Duration::days(self.refresh_token_ttl_days.max(1));

        // Compare-and-swap against the presented fingerprint. A
        // concurrent exchange of the same token already rotated it, so
        // zero rows means this caller lost.
        let rotated = self
            .store
            .rotate_session(session_id, &presented, &new_fingerprint, new_expires_at)
            .await?;
        if !rotated {
            return Err(ServiceError::InvalidRefreshToken);
        }

        let refresh_token = compose_refresh_token(session_id, &new_secret);
        self.issue_tokens(session.user_id, refresh_token)
    }

    /// Revoke the session named by a refresh token. Malformed and
    /// unknown tokens succeed quietly; only store failures propagate.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), ServiceError> {
        let Some((session_id, _)) = parse_refresh_token(refresh_token) else {
            return Ok(());
        };
        self.store.revoke_session(session_id).await?;
        Ok(())
    }

    /// Open a session and return the composed wire token. The raw
    /// secret lives only in the returned string.
    async fn mint_session(
        &self,
        user_id: Uuid,
        meta: SessionMeta,
    ) -> Result<String, ServiceError> {
        let secret = random_secret(REFRESH_SECRET_BYTES);
        let expires_at = Utc::now() + Duration::days(self.refresh_token_ttl_days.max(1));
        let session = Session::new(user_id, fingerprint(&secret), expires_at, meta);

        self.store.insert_session(&session).await?;

        Ok(compose_refresh_token(session.session_id, &secret))
    }

    fn issue_tokens(
        &self,
        user_id: Uuid,
        refresh_token: String,
    ) -> Result<TokenResponse, ServiceError> {
        let access_token = self.signer.generate_access_token(user_id)?;
        Ok(TokenResponse::new(
            access_token,
            refresh_token,
            self.signer.access_token_ttl_seconds(),
        ))
    }
}
