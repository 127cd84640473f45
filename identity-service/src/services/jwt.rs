use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::TokenConfig;

/// Claims for access tokens (short-lived)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Signs and validates access tokens.
///
/// Handlers and the auth service depend on this trait rather than a
/// concrete signer so tests can substitute fixed-secret instances.
pub trait AccessTokenSigner: Send + Sync {
    fn generate_access_token(&self, user_id: Uuid) -> Result<String, anyhow::Error>;
    fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, anyhow::Error>;
    fn access_token_ttl_seconds(&self) -> i64;
}

/// HS256 access token signer.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl_minutes: i64,
}

impl JwtService {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            access_token_ttl_minutes: config.access_token_ttl_minutes,
        }
    }
}

impl AccessTokenSigner for JwtService {
    /// Generate an access token for a user.
    fn generate_access_token(&self, user_id: Uuid) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        // Misconfigured TTLs are clamped to one minute rather than
        // minting already-expired tokens.
        let exp = now + Duration::minutes(self.access_token_ttl_minutes.max(1));

        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode access token: {}", e))
    }

    /// Validate signature and expiry, returning the decoded claims.
    fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, anyhow::Error> {
        let token_data =
            decode::<AccessTokenClaims>(token, &self.decoding_key, &Validation::default())
                .map_err(|e| anyhow::anyhow!("Invalid access token: {}", e))?;

        Ok(token_data.claims)
    }

    /// Access token lifetime in seconds (for the `expires_in` field).
    fn access_token_ttl_seconds(&self) -> i64 {
        self.access_token_ttl_minutes.max(1) * 60
    }
}
