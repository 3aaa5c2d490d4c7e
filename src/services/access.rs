// ABOUTME: Restaurant membership and access policy gating every tenant-scoped operation
// ABOUTME: Answers has-access questions and computes the implicit listing scope for non-admin actors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Access Policy
//!
//! Admins pass every check. Everyone else needs membership of the restaurant
//! that owns the resource. A restaurant that does not exist grants access to
//! nobody, so callers load the resource first and raise `NotFound` before
//! asking.

use tracing::{debug, warn};

use crate::constants::tenancy::{is_core_restaurant, CORE_RESTAURANT_ID};
use crate::database::filters::RestaurantScope;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Actor, User};

/// Membership lookups and access decisions
#[derive(Clone)]
pub struct AccessPolicy {
    database: Database,
}

impl AccessPolicy {
    /// Create a policy over the shared database
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Whether `actor` may act on `restaurant_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the restaurant lookup fails
    pub async fn has_access(&self, actor: &Actor, restaurant_id: &str) -> AppResult<bool> {
        if actor.is_admin() {
            return Ok(true);
        }

        let Some(restaurant) = self.database.restaurants().get(restaurant_id).await? else {
            debug!(restaurant_id, "Access check against unknown restaurant");
            return Ok(false);
        };
        Ok(restaurant.has_member(&actor.id))
    }

    /// Fail with `Forbidden` unless `actor` may act on `restaurant_id`
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` when access is refused, or a database error
    pub async fn ensure_access(&self, actor: &Actor, restaurant_id: &str) -> AppResult<()> {
        if self.has_access(actor, restaurant_id).await? {
            return Ok(());
        }
        warn!(
            user_id = %actor.id,
            restaurant_id,
            "Restaurant access denied"
        );
        Err(
            AppError::forbidden("You do not have access to this restaurant")
                .with_user_id(actor.id.clone())
                .with_resource_id(restaurant_id),
        )
    }

    /// User record by id
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails
    pub async fn find_user_by_id(&self, user_id: &str) -> AppResult<Option<User>> {
        self.database.users().get(user_id).await
    }

    /// Restaurants the user is associated with; empty for unknown users
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails
    pub async fn user_restaurants(&self, user_id: &str) -> AppResult<Vec<String>> {
        Ok(self
            .find_user_by_id(user_id)
            .await?
            .map(|u| u.associated_restaurants)
            .unwrap_or_default())
    }

    /// Listing scope for tenant-owned resources
    ///
    /// An explicit `restaurant_id` is access-checked and used alone. Without
    /// one, admins see everything and other actors see their own restaurants.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for an explicit restaurant the actor cannot access
    pub async fn tenant_scope(
        &self,
        actor: &Actor,
        restaurant_id: Option<&str>,
    ) -> AppResult<RestaurantScope> {
        if let Some(restaurant_id) = restaurant_id {
            self.ensure_access(actor, restaurant_id).await?;
            return Ok(RestaurantScope::single(restaurant_id));
        }
        if actor.is_admin() {
            return Ok(RestaurantScope::All);
        }
        let memberships = self.user_restaurants(&actor.id).await?;
        Ok(implicit_scope(memberships, false))
    }

    /// Listing scope for ingredients, which add the shared core catalogue
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for an explicit tenant restaurant the actor cannot access
    pub async fn ingredient_scope(
        &self,
        actor: &Actor,
        restaurant_id: Option<&str>,
    ) -> AppResult<RestaurantScope> {
        match restaurant_id {
            Some(id) if is_core_restaurant(id) => Ok(RestaurantScope::single(CORE_RESTAURANT_ID)),
            Some(id) => {
                self.ensure_access(actor, id).await?;
                Ok(RestaurantScope::Only(vec![
                    CORE_RESTAURANT_ID.to_owned(),
                    id.to_owned(),
                ]))
            }
            None if actor.is_admin() => Ok(RestaurantScope::All),
            None => {
                let memberships = self.user_restaurants(&actor.id).await?;
                Ok(implicit_scope(memberships, true))
            }
        }
    }
}

/// Scope for a non-admin actor with no explicit restaurant filter
#[must_use]
pub fn implicit_scope(mut memberships: Vec<String>, include_core: bool) -> RestaurantScope {
    if include_core && !memberships.iter().any(|r| is_core_restaurant(r)) {
        memberships.push(CORE_RESTAURANT_ID.to_owned());
    }
    RestaurantScope::Only(memberships)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_scope_without_memberships_is_empty() {
        assert!(implicit_scope(Vec::new(), false).is_empty());
    }

    #[test]
    fn test_implicit_scope_adds_core_once() {
        assert_eq!(
            implicit_scope(vec!["RST-000002".to_owned()], true),
            RestaurantScope::Only(vec!["RST-000002".to_owned(), CORE_RESTAURANT_ID.to_owned()])
        );
        assert_eq!(
            implicit_scope(vec![CORE_RESTAURANT_ID.to_owned()], true),
            RestaurantScope::single(CORE_RESTAURANT_ID)
        );
        assert_eq!(
            implicit_scope(Vec::new(), true),
            RestaurantScope::single(CORE_RESTAURANT_ID)
        );
    }
}
