//! Bearer token signing and verification.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::auth::claims::{Claims, Role};
use crate::config::validation::MIN_SECRET_LEN;
use crate::config::AuthConfig;

/// Errors from token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Signing key shorter than HMAC-SHA256 needs.
    #[error("signing key is {0} bytes, at least {min} required", min = MIN_SECRET_LEN)]
    WeakKey(usize),

    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// Bad signature, malformed token, or expired.
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("token role '{actual}' does not grant '{expected}'")]
    WrongRole { expected: Role, actual: Role },
}

/// Signs and verifies HS256 tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: Option<u64>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl_secs: Option<u64>) -> Result<Self, AuthError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::WeakKey(secret.len()));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(config.secret.as_bytes(), config.token_ttl_secs)
    }

    /// Mint a token binding `subject` to `role`.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat,
            exp: self.ttl_secs.map(|ttl| iat.saturating_add(ttl)),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(AuthError::Encode)
    }

    /// Check signature (and expiry, when present) and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(AuthError::Invalid)
    }

    /// Verify and require a specific role.
    pub fn authorize(&self, token: &str, expected: Role) -> Result<Claims, AuthError> {
        let claims = self.verify(token)?;
        if claims.role != expected {
            return Err(AuthError::WrongRole {
                expected,
                actual: claims.role,
            });
        }
        Ok(claims)
    }
}
