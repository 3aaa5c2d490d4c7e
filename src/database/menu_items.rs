// ABOUTME: Database operations for restaurant-owned menu items and their ordered ingredient references
// ABOUTME: Ingredient names and allergy rollups are derived at read time, never stored here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::filters::{count_rows, fetch_page, fold_search_key, RestaurantScope, WhereClause};
use super::sequence::{next_business_id, EntityKind};
use super::{deserialize_nullable, from_json_column, parse_timestamp, to_json_column};
use crate::errors::{AppError, AppResult};
use crate::pagination::Pagination;

const MENU_ITEM_COLUMNS: &str = "menu_item_id, menu_item_name, menu_item_description, \
    menu_item_ingredients, menu_item_url, restaurant_id, created_at, updated_at";

/// A dish on a restaurant's menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Business id (`MID-######`)
    pub menu_item_id: String,
    /// Display name
    pub menu_item_name: String,
    /// Optional description
    pub menu_item_description: Option<String>,
    /// Ordered ingredient ids
    pub menu_item_ingredients: Vec<String>,
    /// Optional image reference
    pub menu_item_url: Option<String>,
    /// Owning restaurant
    pub restaurant_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create a menu item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemRequest {
    /// Display name
    pub menu_item_name: String,
    /// Optional description
    pub menu_item_description: Option<String>,
    /// Ordered ingredient ids
    #[serde(default)]
    pub menu_item_ingredients: Vec<String>,
    /// Optional image reference
    pub menu_item_url: Option<String>,
    /// Owning restaurant
    pub restaurant_id: String,
}

/// Partial update of a menu item
///
/// Nullable fields distinguish an absent key (keep) from `null` (clear).
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemRequest {
    /// New display name
    pub menu_item_name: Option<String>,
    /// New description
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub menu_item_description: Option<Option<String>>,
    /// Replacement ingredient ids
    pub menu_item_ingredients: Option<Vec<String>>,
    /// New image reference
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub menu_item_url: Option<Option<String>>,
    /// Rejected unless equal to the stored owner
    pub restaurant_id: Option<String>,
}

/// Filter for listing menu items
#[derive(Debug, Clone, Default)]
pub struct ListMenuItemsFilter {
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// Item references this ingredient directly
    pub ingredient_id: Option<String>,
}

/// Menu item database operations manager
pub struct MenuItemsManager {
    pool: SqlitePool,
}

impl MenuItemsManager {
    /// Create a new menu items manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a menu item with the next `MID-` id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, request: &CreateMenuItemRequest) -> AppResult<MenuItem> {
        let menu_item_id = next_business_id(&self.pool, EntityKind::MenuItem).await?;
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO menu_items (
                menu_item_id, menu_item_name, search_key, menu_item_description,
                menu_item_ingredients, menu_item_url, restaurant_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(&menu_item_id)
        .bind(&request.menu_item_name)
        .bind(fold_search_key(&request.menu_item_name))
        .bind(&request.menu_item_description)
        .bind(to_json_column(&request.menu_item_ingredients)?)
        .bind(&request.menu_item_url)
        .bind(&request.restaurant_id)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create menu item: {e}")))?;

        Ok(MenuItem {
            menu_item_id,
            menu_item_name: request.menu_item_name.clone(),
            menu_item_description: request.menu_item_description.clone(),
            menu_item_ingredients: request.menu_item_ingredients.clone(),
            menu_item_url: request.menu_item_url.clone(),
            restaurant_id: request.restaurant_id.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a menu item by business id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, menu_item_id: &str) -> AppResult<Option<MenuItem>> {
        let row = sqlx::query(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_items WHERE menu_item_id = $1"
        ))
        .bind(menu_item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get menu item: {e}")))?;

        row.map(|r| row_to_menu_item(&r)).transpose()
    }

    /// List menu items within `scope`, ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        filter: &ListMenuItemsFilter,
        scope: &RestaurantScope,
        pagination: Pagination,
    ) -> AppResult<(Vec<MenuItem>, u64)> {
        let mut clause = WhereClause::new();
        if let Some(name) = filter.name.as_deref() {
            clause.name_contains(name);
        }
        if let Some(ingredient_id) = filter.ingredient_id.as_deref() {
            clause.json_array_contains("menu_item_ingredients", ingredient_id);
        }
        clause.restaurant_scope("restaurant_id", scope);

        let total = count_rows(&self.pool, "menu_items", &clause).await?;
        let rows = fetch_page(
            &self.pool,
            MENU_ITEM_COLUMNS,
            "menu_items",
            &clause,
            "menu_item_id ASC",
            pagination,
        )
        .await?;
        let items = rows.iter().map(row_to_menu_item).collect::<AppResult<_>>()?;
        Ok((items, total))
    }

    /// Apply a partial update; the owning restaurant is never written
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(
        &self,
        menu_item_id: &str,
        request: &UpdateMenuItemRequest,
    ) -> AppResult<Option<MenuItem>> {
        let Some(existing) = self.get(menu_item_id).await? else {
            return Ok(None);
        };

        let name = request
            .menu_item_name
            .as_ref()
            .unwrap_or(&existing.menu_item_name);
        let description = request
            .menu_item_description
            .clone()
            .unwrap_or(existing.menu_item_description);
        let ingredients = request
            .menu_item_ingredients
            .as_ref()
            .unwrap_or(&existing.menu_item_ingredients);
        let url = request
            .menu_item_url
            .clone()
            .unwrap_or(existing.menu_item_url);

        let result = sqlx::query(
            r"
            UPDATE menu_items SET
                menu_item_name = $1, search_key = $2, menu_item_description = $3,
                menu_item_ingredients = $4, menu_item_url = $5, updated_at = $6
            WHERE menu_item_id = $7
            ",
        )
        .bind(name)
        .bind(fold_search_key(name))
        .bind(&description)
        .bind(to_json_column(ingredients)?)
        .bind(&url)
        .bind(Utc::now().to_rfc3339())
        .bind(menu_item_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update menu item: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(menu_item_id).await
    }

    /// Delete a menu item
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, menu_item_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM menu_items WHERE menu_item_id = $1")
            .bind(menu_item_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete menu item: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_menu_item(row: &SqliteRow) -> AppResult<MenuItem> {
    let ingredients: Option<String> = row.get("menu_item_ingredients");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(MenuItem {
        menu_item_id: row.get("menu_item_id"),
        menu_item_name: row.get("menu_item_name"),
        menu_item_description: row.get("menu_item_description"),
        menu_item_ingredients: from_json_column(ingredients.as_deref())?,
        menu_item_url: row.get("menu_item_url"),
        restaurant_id: row.get("restaurant_id"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
