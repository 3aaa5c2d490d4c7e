// ABOUTME: Menu section lifecycle gated by restaurant membership
// ABOUTME: Validates optional HH:MM availability window and non-negative item prices
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{info, instrument};

use super::access::AccessPolicy;
use super::ensure_same_restaurant;
use super::validation::{
    require_non_empty, require_non_empty_if_present, require_non_negative,
    validate_optional_time_of_day,
};
use crate::database::menu_sections::{
    CreateMenuSectionRequest, ListMenuSectionsFilter, MenuSection, SectionItem,
    UpdateMenuSectionRequest,
};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Actor;
use crate::pagination::{Page, Pagination};

/// Menu section operations
#[derive(Clone)]
pub struct MenuSectionService {
    database: Database,
    access: AccessPolicy,
}

impl MenuSectionService {
    /// Create the service
    #[must_use]
    pub const fn new(database: Database, access: AccessPolicy) -> Self {
        Self { database, access }
    }

    /// Create a section in a restaurant the actor belongs to
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput`, `InvalidFormat` or `PermissionDenied`
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateMenuSectionRequest,
    ) -> AppResult<MenuSection> {
        require_non_empty("title", &request.title)?;
        require_non_empty("restaurantId", &request.restaurant_id)?;
        validate_optional_time_of_day("startTime", request.start_time.as_deref())?;
        validate_optional_time_of_day("endTime", request.end_time.as_deref())?;
        validate_items(&request.items)?;
        self.access
            .ensure_access(actor, &request.restaurant_id)
            .await?;

        let section = self.database.menu_sections().create(&request).await?;
        info!(
            menu_section_id = %section.menu_section_id,
            restaurant_id = %section.restaurant_id,
            "Menu section created"
        );
        Ok(section)
    }

    /// List sections visible to `actor`
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for an explicit restaurant the actor cannot access
    #[instrument(skip(self, filter), fields(user_id = %actor.id))]
    pub async fn find_all(
        &self,
        actor: &Actor,
        filter: &ListMenuSectionsFilter,
        restaurant_id: Option<&str>,
        pagination: Pagination,
    ) -> AppResult<Page<MenuSection>> {
        let scope = self.access.tenant_scope(actor, restaurant_id).await?;
        if scope.is_empty() {
            return Ok(Page::empty(pagination));
        }

        let (sections, total) = self
            .database
            .menu_sections()
            .list(filter, &scope, pagination)
            .await?;
        Ok(Page::new(sections, total, pagination))
    }

    /// Get one section
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn find_one(&self, actor: &Actor, menu_section_id: &str) -> AppResult<MenuSection> {
        let section = self.load(menu_section_id).await?;
        self.access
            .ensure_access(actor, &section.restaurant_id)
            .await?;
        Ok(section)
    }

    /// Partially update a section
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, `PermissionDenied`, `InvalidInput` or `InvalidFormat`
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn update(
        &self,
        actor: &Actor,
        menu_section_id: &str,
        request: UpdateMenuSectionRequest,
    ) -> AppResult<MenuSection> {
        let existing = self.load(menu_section_id).await?;
        self.access
            .ensure_access(actor, &existing.restaurant_id)
            .await?;
        ensure_same_restaurant(&existing.restaurant_id, request.restaurant_id.as_deref())?;
        require_non_empty_if_present("title", request.title.as_deref())?;
        let start_time = request.start_time.as_ref().and_then(Option::as_deref);
        validate_optional_time_of_day("startTime", start_time)?;
        let end_time = request.end_time.as_ref().and_then(Option::as_deref);
        validate_optional_time_of_day("endTime", end_time)?;
        if let Some(items) = &request.items {
            validate_items(items)?;
        }

        let updated = self
            .database
            .menu_sections()
            .update(menu_section_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Menu section {menu_section_id}")))?;
        info!(menu_section_id, "Menu section updated");
        Ok(updated)
    }

    /// Delete a section
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn delete(&self, actor: &Actor, menu_section_id: &str) -> AppResult<()> {
        let existing = self.load(menu_section_id).await?;
        self.access
            .ensure_access(actor, &existing.restaurant_id)
            .await?;

        if !self.database.menu_sections().delete(menu_section_id).await? {
            return Err(AppError::not_found(format!("Menu section {menu_section_id}")));
        }
        info!(menu_section_id, "Menu section deleted");
        Ok(())
    }

    async fn load(&self, menu_section_id: &str) -> AppResult<MenuSection> {
        self.database
            .menu_sections()
            .get(menu_section_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Menu section {menu_section_id}")))
    }
}

fn validate_items(items: &[SectionItem]) -> AppResult<()> {
    for (index, item) in items.iter().enumerate() {
        require_non_empty(&format!("items[{index}].menuItemId"), &item.menu_item_id)?;
        require_non_empty(&format!("items[{index}].name"), &item.name)?;
        require_non_negative(&format!("items[{index}].price"), item.price)?;
    }
    Ok(())
}
