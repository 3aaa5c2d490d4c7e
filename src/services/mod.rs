// ABOUTME: Domain service layer holding the business rules behind every resource endpoint
// ABOUTME: Services are protocol-agnostic; route handlers only translate HTTP to service calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Each resource service takes the acting [`crate::models::Actor`], applies
//! the access policy, validates input and delegates persistence to the
//! database managers. Ingredient, menu item and recipe reads go through
//! [`enrichment::Enricher`].

/// Restaurant membership and access decisions
pub mod access;
/// Transitive allergy closure over the sub-ingredient graph
pub mod allergy_graph;
/// Allergy catalogue operations
pub mod allergies;
/// Batched read-time enrichment
pub mod enrichment;
/// Equipment catalogue operations
pub mod equipment;
/// Ingredient operations with core sharing
pub mod ingredients;
/// Menu item operations
pub mod menu_items;
/// Menu section operations
pub mod menu_sections;
/// Menu operations
pub mod menus;
/// Recipe operations
pub mod recipes;
/// Restaurant and membership operations
pub mod restaurants;
/// Shared field validation
pub mod validation;

use crate::errors::{AppError, AppResult};

/// Reject an update that tries to move a resource to another restaurant
///
/// # Errors
///
/// Returns `PermissionDenied` when `requested` differs from `current`
pub fn ensure_same_restaurant(current: &str, requested: Option<&str>) -> AppResult<()> {
    match requested {
        Some(requested) if requested != current => Err(AppError::forbidden(
            "restaurantId cannot be changed after creation",
        )
        .with_resource_id(current)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_restaurant_change_is_forbidden() {
        assert!(ensure_same_restaurant("RST-000002", None).is_ok());
        assert!(ensure_same_restaurant("RST-000002", Some("RST-000002")).is_ok());
        let err = ensure_same_restaurant("RST-000002", Some("RST-000003")).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }
}
