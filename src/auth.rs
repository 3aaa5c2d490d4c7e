// ABOUTME: Bearer JWT verification turning a credential into the acting user and role
// ABOUTME: HS256 tokens carry sub, role, iat, exp and the API audience; issuance exists for tooling and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authentication
//!
//! Token issuance belongs to the identity provider. This module only needs
//! to verify what the provider minted and, for tooling and tests, mint
//! tokens with the same shape.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::service_names::API_AUDIENCE;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{Actor, UserRole};

/// Convert a duration to a human-readable format
fn humanize_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds().abs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;

    if hours > 0 {
        format!("{hours} hours")
    } else if minutes > 0 {
        format!("{minutes} minutes")
    } else {
        format!("{total_secs} seconds")
    }
}

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature or audience is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => write!(
                f,
                "JWT token expired {} ago at {}",
                humanize_duration(Utc::now().signed_duration_since(*expired_at)),
                expired_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Self::TokenInvalid { reason } => write!(f, "JWT token is invalid: {reason}"),
            Self::TokenMalformed { details } => write!(f, "JWT token is malformed: {details}"),
        }
    }
}

impl std::error::Error for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match error {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            JwtValidationError::TokenInvalid { .. } => Self::auth_invalid(error.to_string()),
            JwtValidationError::TokenMalformed { .. } => {
                Self::new(ErrorCode::AuthMalformed, error.to_string())
            }
        }
    }
}

/// `JWT` claims for an authenticated actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// Role name (`admin`, `manager`, `user`)
    pub role: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Audience (who the token is intended for)
    pub aud: String,
}

impl Claims {
    /// The actor these claims identify
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::new(self.sub.clone(), UserRole::parse(&self.role))
    }
}

/// Verifies and mints HS256 bearer tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create an auth manager over a shared secret
    #[must_use]
    pub fn new(secret: &[u8], token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry_hours,
        }
    }

    /// Generate a token for `user_id` with `role`
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user_id: &str, role: UserRole) -> AppResult<String> {
        let now = Utc::now();
        self.sign(&Claims {
            sub: user_id.to_owned(),
            role: role.as_str().to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_expiry_hours)).timestamp(),
            aud: API_AUDIENCE.to_owned(),
        })
    }

    /// Sign arbitrary claims, used for expiry and audience tests
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] when the token is expired, carries a
    /// bad signature or audience, or cannot be decoded
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_audience(&[API_AUDIENCE]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(&e))?;

        let expired_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);
        if Utc::now().timestamp() > claims.exp {
            warn!(
                user_id = %claims.sub,
                "JWT token expired {} ago",
                humanize_duration(Utc::now().signed_duration_since(expired_at))
            );
            return Err(JwtValidationError::TokenExpired { expired_at });
        }

        debug!(user_id = %claims.sub, role = %claims.role, "JWT token validated");
        Ok(claims)
    }

    /// Validate a token and return the acting user
    ///
    /// # Errors
    ///
    /// Returns an auth error when validation fails
    pub fn authenticate(&self, token: &str) -> AppResult<Actor> {
        Ok(self.validate_token(token)?.actor())
    }

    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        warn!("JWT token validation failed: {e:?}");
        match e.kind() {
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidAudience => JwtValidationError::TokenInvalid {
                reason: "Token audience does not match this API".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {err}"),
            },
            ErrorKind::Json(err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {err}"),
            },
            ErrorKind::Utf8(err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid UTF-8: {err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> AuthManager {
        AuthManager::new(b"unit-test-secret", 24)
    }

    #[test]
    fn test_token_carries_actor() {
        let auth = manager();
        let token = auth.generate_token("u1", UserRole::Manager).unwrap();
        let actor = auth.authenticate(&token).unwrap();
        assert_eq!(actor.id, "u1");
        assert_eq!(actor.role, UserRole::Manager);
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = manager();
        let now = Utc::now().timestamp();
        let token = auth
            .sign(&Claims {
                sub: "u1".into(),
                role: "user".into(),
                iat: now - 7200,
                exp: now - 3600,
                aud: API_AUDIENCE.into(),
            })
            .unwrap();
        let err = auth.validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenExpired { .. }));
        assert_eq!(AppError::from(err).code, ErrorCode::AuthExpired);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = manager().generate_token("u1", UserRole::User).unwrap();
        let other = AuthManager::new(b"another-secret", 24);
        let err = other.validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenInvalid { .. }));
    }

    #[test]
    fn test_garbage_token_malformed() {
        let err = manager().validate_token("not-a-jwt").unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenMalformed { .. }));
    }
}
