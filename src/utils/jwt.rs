// src/utils/jwt.rs

use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AuthFailure};

/// Fixed issuer stamped into, and required from, every token.
pub const TOKEN_ISSUER: &str = "social-backend";

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Issuer.
    pub iss: String,
    /// Subject - the username the token was issued to.
    pub sub: String,
    /// Issued-at, Unix timestamp.
    pub iat: u64,
    /// Expiration time, Unix timestamp.
    pub exp: u64,
}

/// Issues and verifies HMAC-signed bearer tokens.
///
/// Pure: holds only the signing key and lifetime read at start-up. There is
/// no revocation list, so a token stays valid until `exp` unless the secret
/// is rotated.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = true;
        // Expiry is exact; `verify` also rejects `exp == now`, which the
        // library still accepts with zero leeway.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Signs a token for `username`, valid for the configured lifetime.
    pub fn issue(&self, username: &str) -> Result<String, AppError> {
        let now = unix_now().map_err(|e| AppError::Internal(e.to_string()))?;

        let claims = Claims {
            iss: TOKEN_ISSUER.to_owned(),
            sub: username.to_owned(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Verifies signature, issuer and expiry and returns the subject.
    ///
    /// Every failure collapses into `AuthFailure::InvalidToken` so callers
    /// cannot tell a forged token from an expired one.
    pub fn verify(&self, token: &str) -> Result<String, AuthFailure> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthFailure::InvalidToken)?;

        let now = unix_now().map_err(|_| AuthFailure::InvalidToken)?;
        if data.claims.exp <= now || data.claims.sub.is_empty() {
            return Err(AuthFailure::InvalidToken);
        }
        Ok(data.claims.sub)
    }
}

fn unix_now() -> Result<u64, SystemTimeError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}
