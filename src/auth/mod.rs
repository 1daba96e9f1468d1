use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

pub mod password;

/// Session token claims: the authenticated user and the tenant every
/// data operation is scoped to. The tenant id in here is the only
/// isolation mechanism between tenants - it is never read from request
/// bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,
    pub tenant_id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, tenant_id: Uuid) -> Self {
        let expiry_hours = config::config().security.jwt_expiry_hours;
        Self::with_expiry(user_id, tenant_id, expiry_hours)
    }

    pub fn with_expiry(user_id: Uuid, tenant_id: Uuid, expiry_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            tenant_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Crypto error: {0}")]
    Crypto(String),
}

/// Sign a session token (HS256) for the given claims.
pub fn generate_token(claims: &Claims) -> Result<String, AuthError> {
    sign_with(claims, &config::config().security.jwt_secret)
}

/// Verify signature and expiry, returning the decoded claims.
///
/// Every failure mode (expired, malformed, wrong signature) collapses
/// into the same `InvalidToken` so the response does not leak which
/// check failed.
pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
    verify_with(token, &config::config().security.jwt_secret)
}

fn sign_with(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| AuthError::Crypto(e.to_string()))
}

fn verify_with(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn token_roundtrip_preserves_claims() {
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();

        let token = sign_with(&Claims::with_expiry(user_id, tenant_id, 24), SECRET).unwrap();
        let claims = verify_with(&token, SECRET).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.tenant_id, tenant_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_with(&Claims::with_expiry(Uuid::new_v4(), Uuid::new_v4(), 24), SECRET)
            .unwrap();
        assert!(matches!(verify_with(&token, "other-secret"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            iat: (now - Duration::hours(48)).timestamp(),
            exp: (now - Duration::hours(24)).timestamp(),
        };
        let token = sign_with(&claims, SECRET).unwrap();

        assert!(matches!(verify_with(&token, SECRET), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(verify_with("not-a-jwt", SECRET), Err(AuthError::InvalidToken)));
    }
}
