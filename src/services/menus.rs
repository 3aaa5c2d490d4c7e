// ABOUTME: Menu lifecycle gated by restaurant membership
// ABOUTME: Start and end times must be 24h HH:MM strings; malformed values are rejected before writing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{info, instrument};

use super::access::AccessPolicy;
use super::ensure_same_restaurant;
use super::validation::{
    require_non_empty, require_non_empty_if_present, validate_optional_time_of_day,
    validate_time_of_day,
};
use crate::database::menus::{CreateMenuRequest, ListMenusFilter, Menu, UpdateMenuRequest};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Actor;
use crate::pagination::{Page, Pagination};

/// Menu operations
#[derive(Clone)]
pub struct MenuService {
    database: Database,
    access: AccessPolicy,
}

impl MenuService {
    /// Create the service
    #[must_use]
    pub const fn new(database: Database, access: AccessPolicy) -> Self {
        Self { database, access }
    }

    /// Create a menu in a restaurant the actor belongs to
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput`, `InvalidFormat` or `PermissionDenied`
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn create(&self, actor: &Actor, request: CreateMenuRequest) -> AppResult<Menu> {
        require_non_empty("name", &request.name)?;
        require_non_empty("restaurantId", &request.restaurant_id)?;
        validate_time_of_day("startTime", &request.start_time)?;
        validate_time_of_day("endTime", &request.end_time)?;
        self.access
            .ensure_access(actor, &request.restaurant_id)
            .await?;

        let menu = self.database.menus().create(&request).await?;
        info!(
            menu_id = %menu.menu_id,
            restaurant_id = %menu.restaurant_id,
            "Menu created"
        );
        Ok(menu)
    }

    /// List menus visible to `actor`
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for an explicit restaurant the actor cannot access
    #[instrument(skip(self, filter), fields(user_id = %actor.id))]
    pub async fn find_all(
        &self,
        actor: &Actor,
        filter: &ListMenusFilter,
        restaurant_id: Option<&str>,
        pagination: Pagination,
    ) -> AppResult<Page<Menu>> {
        let scope = self.access.tenant_scope(actor, restaurant_id).await?;
        if scope.is_empty() {
            return Ok(Page::empty(pagination));
        }

        let (menus, total) = self
            .database
            .menus()
            .list(filter, &scope, pagination)
            .await?;
        Ok(Page::new(menus, total, pagination))
    }

    /// Get one menu
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn find_one(&self, actor: &Actor, menu_id: &str) -> AppResult<Menu> {
        let menu = self.load(menu_id).await?;
        self.access
            .ensure_access(actor, &menu.restaurant_id)
            .await?;
        Ok(menu)
    }

    /// Partially update a menu
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, `PermissionDenied`, `InvalidInput` or `InvalidFormat`
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn update(
        &self,
        actor: &Actor,
        menu_id: &str,
        request: UpdateMenuRequest,
    ) -> AppResult<Menu> {
        let existing = self.load(menu_id).await?;
        self.access
            .ensure_access(actor, &existing.restaurant_id)
            .await?;
        ensure_same_restaurant(&existing.restaurant_id, request.restaurant_id.as_deref())?;
        require_non_empty_if_present("name", request.name.as_deref())?;
        validate_optional_time_of_day("startTime", request.start_time.as_deref())?;
        validate_optional_time_of_day("endTime", request.end_time.as_deref())?;

        let updated = self
            .database
            .menus()
            .update(menu_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Menu {menu_id}")))?;
        info!(menu_id, "Menu updated");
        Ok(updated)
    }

    /// Delete a menu
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn delete(&self, actor: &Actor, menu_id: &str) -> AppResult<()> {
        let existing = self.load(menu_id).await?;
        self.access
            .ensure_access(actor, &existing.restaurant_id)
            .await?;

        if !self.database.menus().delete(menu_id).await? {
            return Err(AppError::not_found(format!("Menu {menu_id}")));
        }
        info!(menu_id, "Menu deleted");
        Ok(())
    }

    async fn load(&self, menu_id: &str) -> AppResult<Menu> {
        self.database
            .menus()
            .get(menu_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Menu {menu_id}")))
    }
}
