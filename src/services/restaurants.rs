// ABOUTME: Restaurant lifecycle and the bidirectional restaurant/user membership relation
// ABOUTME: Keeps associatedUsers and each user's associatedRestaurants consistent on every change
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Restaurants
//!
//! A restaurant is the tenant. Membership is stored on both sides: the
//! restaurant lists its users and every user lists its restaurants. Writes
//! touch the user side first so that a failure leaves the restaurant side,
//! which access checks read, unchanged.
//!
//! The creator can never be removed from a restaurant. Deleting the
//! restaurant is the only way to detach them.

use serde::Serialize;
use tracing::{info, instrument, warn};

use super::access::AccessPolicy;
use super::validation::{require_non_empty, require_non_empty_if_present};
use crate::database::filters::RestaurantScope;
use crate::database::restaurants::{
    CreateRestaurantRequest, ListRestaurantsFilter, Restaurant, UpdateRestaurantRequest,
};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::middleware::admin_guard::require_admin;
use crate::models::{Actor, User, UserRole};
use crate::pagination::{Page, Pagination};

/// Public view of a restaurant member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantUser {
    /// User id
    pub id: String,
    /// Login email
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Role
    pub role: UserRole,
}

impl From<User> for RestaurantUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

/// Restaurant operations
#[derive(Clone)]
pub struct RestaurantService {
    database: Database,
    access: AccessPolicy,
}

impl RestaurantService {
    /// Create the service
    #[must_use]
    pub const fn new(database: Database, access: AccessPolicy) -> Self {
        Self { database, access }
    }

    /// Create a restaurant with the actor as creator and first member
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty name
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateRestaurantRequest,
    ) -> AppResult<Restaurant> {
        require_non_empty("name", &request.name)?;

        let restaurant = self.database.restaurants().create(&request, &actor.id).await?;
        if !self
            .database
            .users()
            .add_restaurant(&actor.id, &restaurant.restaurant_id)
            .await?
        {
            warn!(
                restaurant_id = %restaurant.restaurant_id,
                "Creator has no user record; only the restaurant side of membership was written"
            );
        }

        info!(restaurant_id = %restaurant.restaurant_id, "Restaurant created");
        Ok(restaurant)
    }

    /// List restaurants visible to `actor`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    #[instrument(skip(self, filter), fields(user_id = %actor.id))]
    pub async fn find_all(
        &self,
        actor: &Actor,
        filter: &ListRestaurantsFilter,
        pagination: Pagination,
    ) -> AppResult<Page<Restaurant>> {
        let scope = if actor.is_admin() {
            RestaurantScope::All
        } else {
            RestaurantScope::Only(self.access.user_restaurants(&actor.id).await?)
        };
        if scope.is_empty() {
            return Ok(Page::empty(pagination));
        }

        let (restaurants, total) = self
            .database
            .restaurants()
            .list(filter, &scope, pagination)
            .await?;
        Ok(Page::new(restaurants, total, pagination))
    }

    /// Get one restaurant
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn find_one(&self, actor: &Actor, restaurant_id: &str) -> AppResult<Restaurant> {
        let restaurant = self.load(restaurant_id).await?;
        ensure_member(actor, &restaurant)?;
        Ok(restaurant)
    }

    /// Update descriptive fields
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, `PermissionDenied` or `InvalidInput`
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn update(
        &self,
        actor: &Actor,
        restaurant_id: &str,
        request: UpdateRestaurantRequest,
    ) -> AppResult<Restaurant> {
        let existing = self.load(restaurant_id).await?;
        ensure_member(actor, &existing)?;
        require_non_empty_if_present("name", request.name.as_deref())?;

        let updated = self
            .database
            .restaurants()
            .update(restaurant_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Restaurant {restaurant_id}")))?;
        info!(restaurant_id, "Restaurant updated");
        Ok(updated)
    }

    /// Delete a restaurant (admin only), detaching every member first
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` or `ResourceNotFound`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn delete(&self, actor: &Actor, restaurant_id: &str) -> AppResult<()> {
        require_admin(actor)?;
        let existing = self.load(restaurant_id).await?;

        let users = self.database.users();
        for user_id in &existing.associated_users {
            if !users.remove_restaurant(user_id, restaurant_id).await? {
                warn!(restaurant_id, member = %user_id, "Member has no user record, skipping");
            }
        }

        if !self.database.restaurants().delete(restaurant_id).await? {
            return Err(AppError::not_found(format!("Restaurant {restaurant_id}")));
        }
        info!(
            restaurant_id,
            detached_members = existing.associated_users.len(),
            "Restaurant deleted"
        );
        Ok(())
    }

    /// Add a user to a restaurant; a no-op when already a member
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown restaurant or user, or
    /// `PermissionDenied` unless the actor is an admin or a manager of the restaurant
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn add_user(
        &self,
        actor: &Actor,
        restaurant_id: &str,
        member_id: &str,
    ) -> AppResult<Restaurant> {
        let restaurant = self.load(restaurant_id).await?;
        ensure_can_manage_members(actor, &restaurant)?;
        if self.access.find_user_by_id(member_id).await?.is_none() {
            return Err(AppError::not_found(format!("User {member_id}")));
        }

        // Idempotent on the user side, so an existing member is simply re-synced
        self.database
            .users()
            .add_restaurant(member_id, restaurant_id)
            .await?;
        if restaurant.has_member(member_id) {
            return Ok(restaurant);
        }

        let mut members = restaurant.associated_users;
        members.push(member_id.to_owned());
        self.database
            .restaurants()
            .set_associated_users(restaurant_id, &members)
            .await?;

        info!(restaurant_id, member_id, "User added to restaurant");
        self.load(restaurant_id).await
    }

    /// Remove a user from a restaurant
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown restaurant, or
    /// `PermissionDenied` when the actor may not manage members or the user is the creator
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn remove_user(
        &self,
        actor: &Actor,
        restaurant_id: &str,
        member_id: &str,
    ) -> AppResult<Restaurant> {
        let restaurant = self.load(restaurant_id).await?;
        ensure_can_manage_members(actor, &restaurant)?;
        if restaurant.created_by == member_id {
            warn!(restaurant_id, member_id, "Attempt to remove restaurant creator");
            return Err(
                AppError::forbidden("The restaurant creator cannot be removed")
                    .with_resource_id(restaurant_id),
            );
        }

        self.database
            .users()
            .remove_restaurant(member_id, restaurant_id)
            .await?;
        let members: Vec<String> = restaurant
            .associated_users
            .into_iter()
            .filter(|u| u != member_id)
            .collect();
        self.database
            .restaurants()
            .set_associated_users(restaurant_id, &members)
            .await?;

        info!(restaurant_id, member_id, "User removed from restaurant");
        self.load(restaurant_id).await
    }

    /// Members of a restaurant that have a user record, in membership order
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn list_users(
        &self,
        actor: &Actor,
        restaurant_id: &str,
    ) -> AppResult<Vec<RestaurantUser>> {
        let restaurant = self.load(restaurant_id).await?;
        ensure_member(actor, &restaurant)?;

        let users = self
            .database
            .users()
            .get_many(&restaurant.associated_users)
            .await?;
        Ok(users.into_iter().map(RestaurantUser::from).collect())
    }

    async fn load(&self, restaurant_id: &str) -> AppResult<Restaurant> {
        self.database
            .restaurants()
            .get(restaurant_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Restaurant {restaurant_id}")))
    }
}

fn ensure_member(actor: &Actor, restaurant: &Restaurant) -> AppResult<()> {
    if actor.is_admin() || restaurant.has_member(&actor.id) {
        return Ok(());
    }
    warn!(
        user_id = %actor.id,
        restaurant_id = %restaurant.restaurant_id,
        "Restaurant access denied"
    );
    Err(AppError::forbidden("You do not have access to this restaurant")
        .with_user_id(actor.id.clone())
        .with_resource_id(restaurant.restaurant_id.clone()))
}

fn ensure_can_manage_members(actor: &Actor, restaurant: &Restaurant) -> AppResult<()> {
    if actor.is_admin() || (actor.role == UserRole::Manager && restaurant.has_member(&actor.id)) {
        return Ok(());
    }
    Err(
        AppError::forbidden("Only admins or managers of this restaurant can manage its users")
            .with_user_id(actor.id.clone())
            .with_resource_id(restaurant.restaurant_id.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn restaurant(created_by: &str, members: &[&str]) -> Restaurant {
        let now = Utc::now();
        Restaurant {
            restaurant_id: "RST-000005".to_owned(),
            name: "Harbour Grill".to_owned(),
            description: None,
            address: None,
            phone: None,
            email: None,
            website: None,
            created_by: created_by.to_owned(),
            associated_users: members.iter().map(|m| (*m).to_owned()).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_member_management_requires_manager_membership() {
        let r = restaurant("u1", &["u1", "u2", "u3"]);
        assert!(ensure_can_manage_members(&Actor::new("root", UserRole::Admin), &r).is_ok());
        assert!(ensure_can_manage_members(&Actor::new("u2", UserRole::Manager), &r).is_ok());
        assert!(ensure_can_manage_members(&Actor::new("u3", UserRole::User), &r).is_err());
        assert!(ensure_can_manage_members(&Actor::new("u9", UserRole::Manager), &r).is_err());
    }

    #[test]
    fn test_member_read_access() {
        let r = restaurant("u1", &["u1"]);
        assert!(ensure_member(&Actor::new("u1", UserRole::User), &r).is_ok());
        assert!(ensure_member(&Actor::new("u2", UserRole::Manager), &r).is_err());
    }
}
