// ABOUTME: Database operations for menus: active weekdays, HH:MM service window and section references
// ABOUTME: Weekdays are stored as a JSON array of lowercase names and filtered with json_each
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

const MENU_COLUMNS: &str = "menu_id, name, description, active_days, start_time, end_time, \
    menu_sections, restaurant_id, created_at, updated_at";

/// Day of the week a menu is served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl Weekday {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    /// Parse a day name, case-insensitive
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "monday" => Some(Self::Monday),
            "tuesday" => Some(Self::Tuesday),
            "wednesday" => Some(Self::Wednesday),
            "thursday" => Some(Self::Thursday),
            "friday" => Some(Self::Friday),
            "saturday" => Some(Self::Saturday),
            "sunday" => Some(Self::Sunday),
            _ => None,
        }
    }
}

/// A service period grouping menu sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    /// Business id (`MNU-######`)
    pub menu_id: String,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Days the menu is active
    pub active_days: Vec<Weekday>,
    /// Start of service, `HH:MM`
    pub start_time: String,
    /// End of service, `HH:MM`
    pub end_time: String,
    /// Ordered menu section ids
    pub menu_sections: Vec<String>,
    /// Owning restaurant
    pub restaurant_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create a menu
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuRequest {
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Days the menu is active
    #[serde(default)]
    pub active_days: Vec<Weekday>,
    /// Start of service, `HH:MM`
    pub start_time: String,
    /// End of service, `HH:MM`
    pub end_time: String,
    /// Ordered menu section ids
    #[serde(default)]
    pub menu_sections: Vec<String>,
    /// Owning restaurant
    pub restaurant_id: String,
}

/// Partial update of a menu
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuRequest {
    /// New display name
    pub name: Option<String>,
    /// New description; `null` clears it
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub description: Option<Option<String>>,
    /// Replacement active days
    pub active_days: Option<Vec<Weekday>>,
    /// New start of service
    pub start_time: Option<String>,
    /// New end of service
    pub end_time: Option<String>,
    /// Replacement section ids
    pub menu_sections: Option<Vec<String>>,
    /// Rejected unless equal to the stored owner
    pub restaurant_id: Option<String>,
}

/// Filter for listing menus
#[derive(Debug, Clone, Default)]
pub struct ListMenusFilter {
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// Menu is active on this day
    pub active_day: Option<Weekday>,
}

/// Menu database operations manager
pub struct MenusManager {
    pool: SqlitePool,
}

impl MenusManager {
    /// Create a new menus manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a menu with the next `MNU-` id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, request: &CreateMenuRequest) -> AppResult<Menu> {
        let menu_id = next_business_id(&self.pool, EntityKind::Menu).await?;
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO menus (
                menu_id, name, search_key, description, active_days, start_time, end_time,
                menu_sections, restaurant_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(&menu_id)
        .bind(&request.name)
        .bind(fold_search_key(&request.name))
        .bind(&request.description)
        .bind(to_json_column(&request.active_days)?)
        .bind(&request.start_time)
        .bind(&request.end_time)
        .bind(to_json_column(&request.menu_sections)?)
        .bind(&request.restaurant_id)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create menu: {e}")))?;

        Ok(Menu {
            menu_id,
            name: request.name.clone(),
            description: request.description.clone(),
            active_days: request.active_days.clone(),
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
            menu_sections: request.menu_sections.clone(),
            restaurant_id: request.restaurant_id.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a menu by business id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, menu_id: &str) -> AppResult<Option<Menu>> {
        let row = sqlx::query(&format!("SELECT {MENU_COLUMNS} FROM menus WHERE menu_id = $1"))
            .bind(menu_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get menu: {e}")))?;

        row.map(|r| row_to_menu(&r)).transpose()
    }

    /// List menus within `scope`, ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        filter: &ListMenusFilter,
        scope: &RestaurantScope,
        pagination: Pagination,
    ) -> AppResult<(Vec<Menu>, u64)> {
        let mut clause = WhereClause::new();
        if let Some(name) = filter.name.as_deref() {
            clause.name_contains(name);
        }
        if let Some(day) = filter.active_day {
            clause.json_array_contains("active_days", day.as_str());
        }
        clause.restaurant_scope("restaurant_id", scope);

        let total = count_rows(&self.pool, "menus", &clause).await?;
        let rows = fetch_page(
            &self.pool,
            MENU_COLUMNS,
            "menus",
            &clause,
            "menu_id ASC",
            pagination,
        )
        .await?;
        let menus = rows.iter().map(row_to_menu).collect::<AppResult<_>>()?;
        Ok((menus, total))
    }

    /// Apply a partial update; the owning restaurant is never written
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(
        &self,
        menu_id: &str,
        request: &UpdateMenuRequest,
    ) -> AppResult<Option<Menu>> {
        let Some(existing) = self.get(menu_id).await? else {
            return Ok(None);
        };

        let name = request.name.as_ref().unwrap_or(&existing.name);
        let description = request.description.clone().unwrap_or(existing.description);
        let active_days = request.active_days.as_ref().unwrap_or(&existing.active_days);
        let start_time = request.start_time.as_ref().unwrap_or(&existing.start_time);
        let end_time = request.end_time.as_ref().unwrap_or(&existing.end_time);
        let sections = request
            .menu_sections
            .as_ref()
            .unwrap_or(&existing.menu_sections);

        let result = sqlx::query(
            r"
            UPDATE menus SET
                name = $1, search_key = $2, description = $3, active_days = $4,
                start_time = $5, end_time = $6, menu_sections = $7, updated_at = $8
            WHERE menu_id = $9
            ",
        )
        .bind(name)
        .bind(fold_search_key(name))
        .bind(&description)
        .bind(to_json_column(active_days)?)
        .bind(start_time)
        .bind(end_time)
        .bind(to_json_column(sections)?)
        .bind(Utc::now().to_rfc3339())
        .bind(menu_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update menu: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(menu_id).await
    }

    /// Delete a menu
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, menu_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM menus WHERE menu_id = $1")
            .bind(menu_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete menu: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_menu(row: &SqliteRow) -> AppResult<Menu> {
    let active_days: Option<String> = row.get("active_days");
    let sections: Option<String> = row.get("menu_sections");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Menu {
        menu_id: row.get("menu_id"),
        name: row.get("name"),
        description: row.get("description"),
        active_days: from_json_column(active_days.as_deref())?,
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        menu_sections: from_json_column(sections.as_deref())?,
        restaurant_id: row.get("restaurant_id"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_parse() {
        assert_eq!(Weekday::parse("Friday"), Some(Weekday::Friday));
        assert_eq!(Weekday::parse("funday"), None);
        assert_eq!(
            serde_json::to_string(&[Weekday::Monday, Weekday::Sunday]).unwrap(),
            r#"["monday","sunday"]"#
        );
    }
}
