// ABOUTME: Bearer token authentication for every /api request
// ABOUTME: Extracts the Authorization header and resolves it to the acting user via AuthManager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::http::{header::AUTHORIZATION, HeaderMap};
use tracing::{debug, instrument, Span};

use crate::auth::AuthManager;
use crate::errors::{AppError, AppResult};
use crate::models::Actor;

/// Extract the bearer token from request headers
///
/// # Errors
///
/// Returns `AuthRequired` when the header is missing and `AuthInvalid` when
/// it is not a `Bearer` credential
pub fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(AppError::auth_required)?
        .to_str()
        .map_err(|_| AppError::auth_invalid("Authorization header is not valid UTF-8"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::auth_invalid("Authorization header must use the Bearer scheme"))
}

/// Authenticate a request from its headers
///
/// # Errors
///
/// Returns an auth error when the credential is missing or fails validation
#[instrument(skip(headers, auth_manager), fields(user_id = tracing::field::Empty))]
pub fn authenticate(headers: &HeaderMap, auth_manager: &AuthManager) -> AppResult<Actor> {
    let token = bearer_token(headers)?;
    let actor = auth_manager.authenticate(token)?;
    Span::current().record("user_id", actor.id.as_str());
    debug!(role = %actor.role.as_str(), "Request authenticated");
    Ok(actor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::models::UserRole;
    use axum::http::HeaderValue;

    #[test]
    fn test_missing_header_requires_auth() {
        let auth = AuthManager::new(b"secret", 1);
        let err = authenticate(&HeaderMap::new(), &auth).unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthRequired);
        assert_eq!(err.http_status(), 401);
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers).unwrap_err().code, ErrorCode::AuthInvalid);
    }

    #[test]
    fn test_valid_bearer_resolves_actor() {
        let auth = AuthManager::new(b"secret", 1);
        let token = auth.generate_token("u7", UserRole::Admin).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        let actor = authenticate(&headers, &auth).unwrap();
        assert_eq!(actor.id, "u7");
        assert!(actor.is_admin());
    }
}
