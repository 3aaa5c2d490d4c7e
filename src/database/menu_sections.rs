// ABOUTME: Database operations for menu sections and their priced, ordered item entries
// ABOUTME: Section items are embedded JSON documents; order defaults to the array position
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

const SECTION_COLUMNS: &str = "menu_section_id, title, description, start_time, end_time, items, \
    restaurant_id, created_at, updated_at";

/// A priced menu item placed in a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionItem {
    /// Referenced menu item id
    pub menu_item_id: String,
    /// Display name within the section
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Price, must not be negative
    pub price: f64,
    /// Optional image reference
    pub image_url: Option<String>,
    /// Position; filled with the array index when absent
    pub order: Option<u32>,
}

/// A titled group of items within a menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    /// Business id (`MSC-######`)
    pub menu_section_id: String,
    /// Section title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional start of availability, `HH:MM`
    pub start_time: Option<String>,
    /// Optional end of availability, `HH:MM`
    pub end_time: Option<String>,
    /// Ordered items
    pub items: Vec<SectionItem>,
    /// Owning restaurant
    pub restaurant_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create a menu section
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuSectionRequest {
    /// Section title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional start of availability
    pub start_time: Option<String>,
    /// Optional end of availability
    pub end_time: Option<String>,
    /// Ordered items
    #[serde(default)]
    pub items: Vec<SectionItem>,
    /// Owning restaurant
    pub restaurant_id: String,
}

/// Partial update of a menu section
///
/// The nullable fields treat an absent key as "keep" and `null` as "clear".
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuSectionRequest {
    /// New title
    pub title: Option<String>,
    /// New description
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub description: Option<Option<String>>,
    /// New start of availability
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub start_time: Option<Option<String>>,
    /// New end of availability
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub end_time: Option<Option<String>>,
    /// Replacement items
    pub items: Option<Vec<SectionItem>>,
    /// Rejected unless equal to the stored owner
    pub restaurant_id: Option<String>,
}

/// Filter for listing menu sections
#[derive(Debug, Clone, Default)]
pub struct ListMenuSectionsFilter {
    /// Case-insensitive title substring
    pub title: Option<String>,
}

/// Fill missing item `order` values with their array index
#[must_use]
pub fn normalize_items(items: &[SectionItem]) -> Vec<SectionItem> {
    items
        .iter()
        .zip(0_u32..)
        .map(|(item, index)| SectionItem {
            order: Some(item.order.unwrap_or(index)),
            ..item.clone()
        })
        .collect()
}

/// Menu section database operations manager
pub struct MenuSectionsManager {
    pool: SqlitePool,
}

impl MenuSectionsManager {
    /// Create a new menu sections manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a section with the next `MSC-` id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, request: &CreateMenuSectionRequest) -> AppResult<MenuSection> {
        let menu_section_id = next_business_id(&self.pool, EntityKind::MenuSection).await?;
        let items = normalize_items(&request.items);
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO menu_sections (
                menu_section_id, title, search_key, description, start_time, end_time, items,
                restaurant_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(&menu_section_id)
        .bind(&request.title)
        .bind(fold_search_key(&request.title))
        .bind(&request.description)
        .bind(&request.start_time)
        .bind(&request.end_time)
        .bind(to_json_column(&items)?)
        .bind(&request.restaurant_id)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create menu section: {e}")))?;

        Ok(MenuSection {
            menu_section_id,
            title: request.title.clone(),
            description: request.description.clone(),
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
            items,
            restaurant_id: request.restaurant_id.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a section by business id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, menu_section_id: &str) -> AppResult<Option<MenuSection>> {
        let row = sqlx::query(&format!(
            "SELECT {SECTION_COLUMNS} FROM menu_sections WHERE menu_section_id = $1"
        ))
        .bind(menu_section_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get menu section: {e}")))?;

        row.map(|r| row_to_section(&r)).transpose()
    }

    /// List sections within `scope`, ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        filter: &ListMenuSectionsFilter,
        scope: &RestaurantScope,
        pagination: Pagination,
    ) -> AppResult<(Vec<MenuSection>, u64)> {
        let mut clause = WhereClause::new();
        if let Some(title) = filter.title.as_deref() {
            clause.name_contains(title);
        }
        clause.restaurant_scope("restaurant_id", scope);

        let total = count_rows(&self.pool, "menu_sections", &clause).await?;
        let rows = fetch_page(
            &self.pool,
            SECTION_COLUMNS,
            "menu_sections",
            &clause,
            "menu_section_id ASC",
            pagination,
        )
        .await?;
        let sections = rows.iter().map(row_to_section).collect::<AppResult<_>>()?;
        Ok((sections, total))
    }

    /// Apply a partial update; the owning restaurant is never written
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(
        &self,
        menu_section_id: &str,
        request: &UpdateMenuSectionRequest,
    ) -> AppResult<Option<MenuSection>> {
        let Some(existing) = self.get(menu_section_id).await? else {
            return Ok(None);
        };

        let title = request.title.as_ref().unwrap_or(&existing.title);
        let description = request.description.clone().unwrap_or(existing.description);
        let start_time = request.start_time.clone().unwrap_or(existing.start_time);
        let end_time = request.end_time.clone().unwrap_or(existing.end_time);
        let items = request
            .items
            .as_deref()
            .map_or(existing.items, normalize_items);

        let result = sqlx::query(
            r"
            UPDATE menu_sections SET
                title = $1, search_key = $2, description = $3, start_time = $4,
                end_time = $5, items = $6, updated_at = $7
            WHERE menu_section_id = $8
            ",
        )
        .bind(title)
        .bind(fold_search_key(title))
        .bind(&description)
        .bind(&start_time)
        .bind(&end_time)
        .bind(to_json_column(&items)?)
        .bind(Utc::now().to_rfc3339())
        .bind(menu_section_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update menu section: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(menu_section_id).await
    }

    /// Delete a section
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, menu_section_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM menu_sections WHERE menu_section_id = $1")
            .bind(menu_section_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete menu section: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_section(row: &SqliteRow) -> AppResult<MenuSection> {
    let items: Option<String> = row.get("items");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(MenuSection {
        menu_section_id: row.get("menu_section_id"),
        title: row.get("title"),
        description: row.get("description"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        items: from_json_column(items.as_deref())?,
        restaurant_id: row.get("restaurant_id"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, order: Option<u32>) -> SectionItem {
        SectionItem {
            menu_item_id: id.to_owned(),
            name: format!("Item {id}"),
            description: None,
            price: 9.5,
            image_url: None,
            order,
        }
    }

    #[test]
    fn test_normalize_items_keeps_explicit_order() {
        let items = normalize_items(&[item("MID-000001", None), item("MID-000002", Some(5))]);
        let orders: Vec<_> = items.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![Some(0), Some(5)]);
    }

    #[tokio::test]
    async fn test_update_clears_nullable_fields_only_when_null() {
        let db = crate::database::Database::new("sqlite::memory:").await.unwrap();
        let sections = db.menu_sections();
        let created = sections
            .create(&CreateMenuSectionRequest {
                title: "Brunch".to_owned(),
                description: Some("Weekend only".to_owned()),
                start_time: Some("10:00".to_owned()),
                end_time: Some("14:00".to_owned()),
                items: vec![],
                restaurant_id: "RST-000002".to_owned(),
            })
            .await
            .unwrap();

        let patch: UpdateMenuSectionRequest =
            serde_json::from_str(r#"{"description": null, "endTime": "15:00"}"#).unwrap();
        let updated = sections
            .update(&created.menu_section_id, &patch)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.description, None);
        assert_eq!(updated.start_time.as_deref(), Some("10:00"));
        assert_eq!(updated.end_time.as_deref(), Some("15:00"));
        assert_eq!(updated.title, "Brunch");
    }

    #[test]
    fn test_section_item_wire_names() {
        let parsed: SectionItem = serde_json::from_str(
            r#"{"menuItemId":"MID-000003","name":"Fries","price":4.0,"imageUrl":"fries.png"}"#,
        )
        .unwrap();
        assert_eq!(parsed.menu_item_id, "MID-000003");
        assert_eq!(parsed.image_url.as_deref(), Some("fries.png"));
        assert_eq!(parsed.order, None);
    }
}
