// ABOUTME: Menu item lifecycle gated by restaurant membership
// ABOUTME: Every read returns items enriched with ingredient names and the transitive allergy rollup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{info, instrument};

use super::access::AccessPolicy;
use super::enrichment::{EnrichedMenuItem, Enricher};
use super::ensure_same_restaurant;
use super::validation::{require_non_empty, require_non_empty_if_present};
use crate::database::menu_items::{
    CreateMenuItemRequest, ListMenuItemsFilter, MenuItem, UpdateMenuItemRequest,
};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Actor;
use crate::pagination::{Page, Pagination};

/// Menu item operations
#[derive(Clone)]
pub struct MenuItemService {
    database: Database,
    access: AccessPolicy,
    enricher: Enricher,
}

impl MenuItemService {
    /// Create the service
    #[must_use]
    pub fn new(database: Database, access: AccessPolicy, enricher: Enricher) -> Self {
        Self {
            database,
            access,
            enricher,
        }
    }

    /// Create a menu item in a restaurant the actor belongs to
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` or `PermissionDenied`
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateMenuItemRequest,
    ) -> AppResult<EnrichedMenuItem> {
        require_non_empty("menuItemName", &request.menu_item_name)?;
        require_non_empty("restaurantId", &request.restaurant_id)?;
        self.access
            .ensure_access(actor, &request.restaurant_id)
            .await?;

        let item = self.database.menu_items().create(&request).await?;
        info!(
            menu_item_id = %item.menu_item_id,
            restaurant_id = %item.restaurant_id,
            "Menu item created"
        );
        self.enrich_one(item).await
    }

    /// List menu items visible to `actor`
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for an explicit restaurant the actor cannot access
    #[instrument(skip(self, filter), fields(user_id = %actor.id))]
    pub async fn find_all(
        &self,
        actor: &Actor,
        filter: &ListMenuItemsFilter,
        restaurant_id: Option<&str>,
        pagination: Pagination,
    ) -> AppResult<Page<EnrichedMenuItem>> {
        let scope = self.access.tenant_scope(actor, restaurant_id).await?;
        if scope.is_empty() {
            return Ok(Page::empty(pagination));
        }

        let (items, total) = self
            .database
            .menu_items()
            .list(filter, &scope, pagination)
            .await?;
        let enriched = self.enricher.enrich_menu_items(items).await?;
        Ok(Page::new(enriched, total, pagination))
    }

    /// Get one menu item
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn find_one(&self, actor: &Actor, menu_item_id: &str) -> AppResult<EnrichedMenuItem> {
        let item = self.load(menu_item_id).await?;
        self.access
            .ensure_access(actor, &item.restaurant_id)
            .await?;
        self.enrich_one(item).await
    }

    /// Partially update a menu item
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, `PermissionDenied` or `InvalidInput`
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn update(
        &self,
        actor: &Actor,
        menu_item_id: &str,
        request: UpdateMenuItemRequest,
    ) -> AppResult<EnrichedMenuItem> {
        let existing = self.load(menu_item_id).await?;
        self.access
            .ensure_access(actor, &existing.restaurant_id)
            .await?;
        ensure_same_restaurant(&existing.restaurant_id, request.restaurant_id.as_deref())?;
        require_non_empty_if_present("menuItemName", request.menu_item_name.as_deref())?;

        let updated = self
            .database
            .menu_items()
            .update(menu_item_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Menu item {menu_item_id}")))?;
        info!(menu_item_id, "Menu item updated");
        self.enrich_one(updated).await
    }

    /// Delete a menu item
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn delete(&self, actor: &Actor, menu_item_id: &str) -> AppResult<()> {
        let existing = self.load(menu_item_id).await?;
        self.access
            .ensure_access(actor, &existing.restaurant_id)
            .await?;

        if !self.database.menu_items().delete(menu_item_id).await? {
            return Err(AppError::not_found(format!("Menu item {menu_item_id}")));
        }
        info!(menu_item_id, "Menu item deleted");
        Ok(())
    }

    async fn load(&self, menu_item_id: &str) -> AppResult<MenuItem> {
        self.database
            .menu_items()
            .get(menu_item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Menu item {menu_item_id}")))
    }

    async fn enrich_one(&self, item: MenuItem) -> AppResult<EnrichedMenuItem> {
        self.enricher
            .enrich_menu_items(vec![item])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("Menu item enrichment returned no result"))
    }
}
