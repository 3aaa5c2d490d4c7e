// ABOUTME: Central admin authorization guard for operations restricted to the global admin role
// ABOUTME: Returns 403 Forbidden when the acting user is not an admin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Admin Authorization Guard
//!
//! Services call [`require_admin`] instead of repeating inline
//! `actor.is_admin()` checks.
//!
//! ```rust,no_run
//! use menu_training_server::middleware::admin_guard::require_admin;
//! use menu_training_server::models::Actor;
//!
//! fn delete_everything(actor: &Actor) -> Result<(), menu_training_server::errors::AppError> {
//!     require_admin(actor)?;
//!     Ok(())
//! }
//! ```

use tracing::warn;

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::Actor;

/// Require admin privileges for the acting user
///
/// # Errors
///
/// Returns `PermissionDenied` (403) when the actor is not an admin
pub fn require_admin(actor: &Actor) -> AppResult<()> {
    if actor.is_admin() {
        return Ok(());
    }
    warn!(user_id = %actor.id, role = %actor.role.as_str(), "Admin privileges required");
    Err(
        AppError::new(ErrorCode::PermissionDenied, "Admin privileges required")
            .with_user_id(actor.id.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    #[test]
    fn test_only_admin_passes() {
        assert!(require_admin(&Actor::new("a", UserRole::Admin)).is_ok());
        for role in [UserRole::Manager, UserRole::User] {
            let err = require_admin(&Actor::new("u", role)).unwrap_err();
            assert_eq!(err.code, ErrorCode::PermissionDenied);
            assert_eq!(err.http_status(), 403);
        }
    }
}
