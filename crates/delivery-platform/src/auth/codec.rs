//! # Claims Codec
//!
//! Signs [`Claims`] into an opaque bearer token and verifies tokens back into claims.
//! Tokens are HS256 JWTs carrying `sub`, `email`, `role`, `iat` and `exp`.
//!
//! [`ClaimsCodec::verify`] only checks structure and signature. Expiry is judged by the caller
//! against its own [`Clock`](super::Clock), so tests can drive time.

use super::{AuthError, Claims};
use crate::model::{Role, UserId};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Wire form of the claims.
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    email: String,
    role: Role,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct ClaimsCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl ClaimsCodec {
    pub fn new(secret: &SecretString) -> Self {
        let key = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
        }
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let wire = TokenClaims {
            sub: claims.sub.0.to_string(),
            email: claims.email.clone(),
            role: claims.role,
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    /// Decodes `token` and checks its signature. Does not look at `exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => AuthError::TokenInvalidSignature,
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenMalformed,
            }
        })?;
        let wire = data.claims;

        let sub = wire
            .sub
            .parse::<u32>()
            .map(UserId)
            .map_err(|_| AuthError::TokenMalformed)?;
        Ok(Claims {
            sub,
            email: wire.email,
            role: wire.role,
            issued_at: timestamp(wire.iat)?,
            expires_at: timestamp(wire.exp)?,
        })
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, AuthError> {
    DateTime::from_timestamp(secs, 0).ok_or(AuthError::TokenMalformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn codec(secret: &str) -> ClaimsCodec {
        ClaimsCodec::new(&SecretString::from(secret.to_string()))
    }

    fn claims() -> Claims {
        let issued_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        Claims {
            sub: UserId(42),
            email: "rosa@example.com".into(),
            role: Role::Merchant,
            issued_at,
            expires_at: issued_at + Duration::hours(24),
        }
    }

    #[test]
    fn verify_returns_what_was_signed() {
        let codec = codec("a-test-secret-that-is-long-enough-123");
        let token = codec.sign(&claims()).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), claims());
    }

    #[test]
    fn long_expired_token_still_verifies() {
        let codec = codec("a-test-secret-that-is-long-enough-123");
        let mut old = claims();
        old.issued_at = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        old.expires_at = old.issued_at + Duration::hours(1);

        let token = codec.sign(&old).unwrap();
        assert_eq!(codec.verify(&token).unwrap().expires_at, old.expires_at);
    }

    #[test]
    fn any_altered_token_is_rejected() {
        let codec = codec("a-test-secret-that-is-long-enough-123");
        let token = codec.sign(&claims()).unwrap();

        for i in 0..token.len() {
            let original = token.as_bytes()[i];
            if original == b'.' {
                continue;
            }
            let replacement = if original == b'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(i..=i, &replacement.to_string());
            if tampered == token {
                continue;
            }
            assert!(codec.verify(&tampered).is_err(), "byte {i} altered");
        }
    }

    #[test]
    fn other_secret_fails_signature() {
        let token = codec("a-test-secret-that-is-long-enough-123")
            .sign(&claims())
            .unwrap();
        let err = codec("another-secret-also-long-enough-4567")
            .verify(&token)
            .unwrap_err();
        assert_eq!(err, AuthError::TokenInvalidSignature);
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = codec("a-test-secret-that-is-long-enough-123");
        for token in ["", "abc", "a.b.c", "Bearer x"] {
            assert_eq!(codec.verify(token).unwrap_err(), AuthError::TokenMalformed);
        }
    }
}
