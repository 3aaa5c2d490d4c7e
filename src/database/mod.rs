// ABOUTME: SQLite database management for the menu training API: pool setup, migrations and managers
// ABOUTME: Exposes per-entity managers sharing one pool plus JSON column and timestamp helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! One `SqlitePool` backs every entity manager. List-valued fields (ingredient
//! references, allergy sets, recipe steps, section items, memberships) are
//! stored as JSON TEXT columns and queried with `json_each`.

/// Allergy catalogue storage
pub mod allergies;
/// Equipment catalogue storage
pub mod equipment;
/// Typed filter to SQL predicate adapter
pub mod filters;
/// Ingredient storage
pub mod ingredients;
/// Menu item storage
pub mod menu_items;
/// Menu section storage
pub mod menu_sections;
/// Menu storage
pub mod menus;
/// Recipe storage
pub mod recipes;
/// Repository seams used by enrichment
pub mod repositories;
/// Restaurant storage and membership columns
pub mod restaurants;
/// Business identifier sequence
pub mod sequence;
/// User records (membership side)
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};

use self::allergies::AllergiesManager;
use self::equipment::EquipmentManager;
use self::ingredients::IngredientsManager;
use self::menu_items::MenuItemsManager;
use self::menu_sections::MenuSectionsManager;
use self::menus::MenusManager;
use self::recipes::RecipesManager;
use self::restaurants::RestaurantsManager;
use self::users::UsersManager;

/// Database handle shared by services
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run migrations
    ///
    /// In-memory URLs are pinned to a single long-lived connection so every
    /// query sees the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails or a migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let in_memory = database_url.contains(":memory:");

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid DATABASE_URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new()
                .max_connections(8)
                .acquire_timeout(Duration::from_secs(10))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        info!(in_memory, "Database connection established");
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails
    pub async fn from_pool(pool: SqlitePool) -> AppResult<Self> {
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any `CREATE` statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        for statement in MIGRATIONS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        debug!(statements = MIGRATIONS.len(), "Database migrations applied");
        Ok(())
    }

    /// User records
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Restaurants
    #[must_use]
    pub fn restaurants(&self) -> RestaurantsManager {
        RestaurantsManager::new(self.pool.clone())
    }

    /// Allergies
    #[must_use]
    pub fn allergies(&self) -> AllergiesManager {
        AllergiesManager::new(self.pool.clone())
    }

    /// Equipment
    #[must_use]
    pub fn equipment(&self) -> EquipmentManager {
        EquipmentManager::new(self.pool.clone())
    }

    /// Ingredients
    #[must_use]
    pub fn ingredients(&self) -> IngredientsManager {
        IngredientsManager::new(self.pool.clone())
    }

    /// Menu items
    #[must_use]
    pub fn menu_items(&self) -> MenuItemsManager {
        MenuItemsManager::new(self.pool.clone())
    }

    /// Menu sections
    #[must_use]
    pub fn menu_sections(&self) -> MenuSectionsManager {
        MenuSectionsManager::new(self.pool.clone())
    }

    /// Menus
    #[must_use]
    pub fn menus(&self) -> MenusManager {
        MenusManager::new(self.pool.clone())
    }

    /// Recipes
    #[must_use]
    pub fn recipes(&self) -> RecipesManager {
        RecipesManager::new(self.pool.clone())
    }
}

const MIGRATIONS: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL,
        name TEXT,
        role TEXT NOT NULL DEFAULT 'user',
        associated_restaurants TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS restaurants (
        restaurant_id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        search_key TEXT NOT NULL DEFAULT '',
        description TEXT,
        address TEXT,
        phone TEXT,
        email TEXT,
        website TEXT,
        created_by TEXT NOT NULL,
        associated_users TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS allergies (
        allergy_id TEXT PRIMARY KEY,
        allergy_name TEXT NOT NULL,
        search_key TEXT NOT NULL DEFAULT '',
        allergy_logo_url TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS equipment (
        equipment_id TEXT PRIMARY KEY,
        equipment_name TEXT NOT NULL,
        search_key TEXT NOT NULL DEFAULT '',
        equipment_image_url TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS ingredients (
        ingredient_id TEXT PRIMARY KEY,
        ingredient_name TEXT NOT NULL,
        search_key TEXT NOT NULL DEFAULT '',
        ingredient_allergies TEXT NOT NULL DEFAULT '[]',
        ingredient_image_url TEXT,
        sub_ingredients TEXT NOT NULL DEFAULT '[]',
        categories TEXT NOT NULL DEFAULT '[]',
        restaurant_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_ingredients_restaurant ON ingredients(restaurant_id)",
    r"
    CREATE TABLE IF NOT EXISTS menu_items (
        menu_item_id TEXT PRIMARY KEY,
        menu_item_name TEXT NOT NULL,
        search_key TEXT NOT NULL DEFAULT '',
        menu_item_description TEXT,
        menu_item_ingredients TEXT NOT NULL DEFAULT '[]',
        menu_item_url TEXT,
        restaurant_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_menu_items_restaurant ON menu_items(restaurant_id)",
    r"
    CREATE TABLE IF NOT EXISTS recipes (
        recipe_id TEXT PRIMARY KEY,
        recipe_name TEXT NOT NULL,
        search_key TEXT NOT NULL DEFAULT '',
        recipe_description TEXT,
        recipe_image_url TEXT,
        recipe_servings INTEGER NOT NULL,
        recipe_prep_time INTEGER NOT NULL,
        recipe_total_time INTEGER NOT NULL,
        recipe_steps TEXT NOT NULL DEFAULT '[]',
        restaurant_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_recipes_restaurant ON recipes(restaurant_id)",
    r"
    CREATE TABLE IF NOT EXISTS menus (
        menu_id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        search_key TEXT NOT NULL DEFAULT '',
        description TEXT,
        active_days TEXT NOT NULL DEFAULT '[]',
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        menu_sections TEXT NOT NULL DEFAULT '[]',
        restaurant_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_menus_restaurant ON menus(restaurant_id)",
    r"
    CREATE TABLE IF NOT EXISTS menu_sections (
        menu_section_id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        search_key TEXT NOT NULL DEFAULT '',
        description TEXT,
        start_time TEXT,
        end_time TEXT,
        items TEXT NOT NULL DEFAULT '[]',
        restaurant_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_menu_sections_restaurant ON menu_sections(restaurant_id)",
    // Core restaurant owning the shared ingredient catalogue; tenant ids start after it
    r"
    INSERT OR IGNORE INTO restaurants (
        restaurant_id, name, search_key, description, created_by, associated_users,
        created_at, updated_at
    ) VALUES (
        'RST-000001', 'Core Catalogue', 'core catalogue',
        'Shared ingredients visible to every restaurant', 'system', '[]',
        '2025-01-01T00:00:00+00:00', '2025-01-01T00:00:00+00:00'
    )
    ",
];

/// Serialize a list-valued field for a JSON TEXT column
pub(crate) fn to_json_column<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Deserialize a JSON TEXT column, treating NULL or empty text as the default value
pub(crate) fn from_json_column<T: DeserializeOwned + Default>(raw: Option<&str>) -> AppResult<T> {
    match raw {
        Some(text) if !text.trim().is_empty() => Ok(serde_json::from_str(text)?),
        _ => Ok(T::default()),
    }
}

/// `deserialize_with` target for clearable fields of partial updates
///
/// Paired with `#[serde(default)]`: an absent field stays `None` (keep the
/// stored value) while an explicit `null` becomes `Some(None)` (clear it).
#[allow(clippy::option_option)]
pub(crate) fn deserialize_nullable<'de, D, T>(
    deserializer: D,
) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parse an RFC 3339 timestamp column
pub(crate) fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_column_round_trip_and_defaults() {
        let ids = vec!["ING-000001".to_owned(), "ING-000002".to_owned()];
        let text = to_json_column(&ids).unwrap();
        let back: Vec<String> = from_json_column(Some(&text)).unwrap();
        assert_eq!(back, ids);

        let empty: Vec<String> = from_json_column(None).unwrap();
        assert!(empty.is_empty());
        let blank: Vec<String> = from_json_column(Some("  ")).unwrap();
        assert!(blank.is_empty());
    }

    #[allow(clippy::option_option)]
    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_nullable")]
        logo: Option<Option<String>>,
    }

    #[test]
    fn test_nullable_update_field_separates_absent_from_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.logo, None);

        let cleared: Patch = serde_json::from_str(r#"{"logo": null}"#).unwrap();
        assert_eq!(cleared.logo, Some(None));

        let set: Patch = serde_json::from_str(r#"{"logo": "a.png"}"#).unwrap();
        assert_eq!(set.logo, Some(Some("a.png".to_owned())));
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2025-01-01T00:00:00+00:00").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_in_memory_database_migrates() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'ingredients'",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(row.0, 1);

        // idempotent
        db.migrate().await.unwrap();

        let core = db
            .restaurants()
            .get(crate::constants::tenancy::CORE_RESTAURANT_ID)
            .await
            .unwrap();
        assert!(core.is_some());
    }
}
