//! Refresh token primitives.
//!
//! A refresh token on the wire is `{session_id}.{secret}` where the
//! secret is random bytes in base64url. Only the SHA-256 fingerprint of
//! the secret is ever stored, so a leaked sessions table cannot be
//! replayed as live tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Entropy of the refresh secret in raw bytes (before encoding).
pub const REFRESH_SECRET_BYTES: usize = 48;

/// Generate a random secret of `byte_length` bytes, base64url encoded
/// without padding.
pub fn random_secret(byte_length: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut bytes = vec![0u8; byte_length];
    rng.fill(bytes.as_mut_slice());
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 fingerprint of a refresh secret, base64url encoded without
/// padding. This is the stored form of the secret.
pub fn fingerprint(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Compose the wire form of a refresh token.
pub fn compose_refresh_token(session_id: Uuid, secret: &str) -> String {
    format!("{}.{}", session_id, secret)
}

/// Split a wire token into its session id and secret.
///
/// Returns None when the delimiter is missing, either half is empty, or
/// the id half is not a UUID. Callers treat all of those identically to
/// an unknown session.
pub fn parse_refresh_token(token: &str) -> Option<(Uuid, &str)> {
    let (id_part, secret) = token.split_once('.')?;
    if id_part.is_empty() || secret.is_empty() {
        return None;
    }
    let session_id = Uuid::parse_str(id_part).ok()?;
    Some((session_id, secret))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_secret_is_urlsafe() {
        let secret = random_secret(REFRESH_SECRET_BYTES);

        // 48 bytes -> 64 base64 chars, no padding
        assert_eq!(secret.len(), 64);
        assert!(!secret.contains('='));
        assert!(!secret.contains('+'));
        assert!(!secret.contains('/'));
    }

    #[test]
    fn test_random_secrets_differ() {
        assert_ne!(
            random_secret(REFRESH_SECRET_BYTES),
            random_secret(REFRESH_SECRET_BYTES)
        );
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let secret = random_secret(REFRESH_SECRET_BYTES);

        assert_eq!(fingerprint(&secret), fingerprint(&secret));
        assert_ne!(fingerprint(&secret), fingerprint("other"));
        // SHA-256 -> 32 bytes -> 43 base64url chars
        assert_eq!(fingerprint(&secret).len(), 43);
    }

    #[test]
    fn test_compose_parse_roundtrip() {
        let session_id = Uuid::new_v4();
        let secret = random_secret(REFRESH_SECRET_BYTES);
        let token = compose_refresh_token(session_id, &secret);

        let (parsed_id, parsed_secret) = parse_refresh_token(&token).unwrap();
        assert_eq!(parsed_id, session_id);
        assert_eq!(parsed_secret, secret);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_refresh_token("no-delimiter").is_none());
        assert!(parse_refresh_token("").is_none());
        assert!(parse_refresh_token(".secret-without-id").is_none());
        assert!(parse_refresh_token(&format!("{}.", Uuid::new_v4())).is_none());
        assert!(parse_refresh_token("not-a-uuid.secret").is_none());
    }

    #[test]
    fn test_parse_splits_on_first_dot() {
        let session_id = Uuid::new_v4();
        let token = format!("{}.se.cret", session_id);

        let (parsed_id, parsed_secret) = parse_refresh_token(&token).unwrap();
        assert_eq!(parsed_id, session_id);
        assert_eq!(parsed_secret, "se.cret");
    }
}
