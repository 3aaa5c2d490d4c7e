// ABOUTME: Database operations for restaurants (tenants) and the restaurant side of user membership
// ABOUTME: Stores creator and associated user ids; the users table mirrors the relation from the other side
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

const RESTAURANT_COLUMNS: &str = "restaurant_id, name, description, address, phone, email, \
    website, created_by, associated_users, created_at, updated_at";

/// A tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Business id (`RST-######`)
    pub restaurant_id: String,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional street address
    pub address: Option<String>,
    /// Optional phone number
    pub phone: Option<String>,
    /// Optional contact email
    pub email: Option<String>,
    /// Optional website
    pub website: Option<String>,
    /// User who created the restaurant; can never be removed from `associated_users`
    pub created_by: String,
    /// Member user ids
    pub associated_users: Vec<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    /// Whether `user_id` is a member
    #[must_use]
    pub fn has_member(&self, user_id: &str) -> bool {
        self.associated_users.iter().any(|u| u == user_id)
    }
}

/// Request to create a restaurant
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantRequest {
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional street address
    pub address: Option<String>,
    /// Optional phone number
    pub phone: Option<String>,
    /// Optional contact email
    pub email: Option<String>,
    /// Optional website
    pub website: Option<String>,
}

/// Partial update of a restaurant's descriptive fields
///
/// Every field except `name` is nullable: an absent key keeps the stored
/// value and an explicit `null` clears it.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRestaurantRequest {
    /// New display name
    pub name: Option<String>,
    /// New description
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub description: Option<Option<String>>,
    /// New street address
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub address: Option<Option<String>>,
    /// New phone number
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub phone: Option<Option<String>>,
    /// New contact email
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub email: Option<Option<String>>,
    /// New website
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub website: Option<Option<String>>,
}

/// Filter for listing restaurants
#[derive(Debug, Clone, Default)]
pub struct ListRestaurantsFilter {
    /// Case-insensitive name substring
    pub name: Option<String>,
}

/// Restaurant database operations manager
pub struct RestaurantsManager {
    pool: SqlitePool,
}

impl RestaurantsManager {
    /// Create a new restaurants manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a restaurant with `created_by` as its first member
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(
        &self,
        request: &CreateRestaurantRequest,
        created_by: &str,
    ) -> AppResult<Restaurant> {
        let restaurant_id = next_business_id(&self.pool, EntityKind::Restaurant).await?;
        let associated_users = vec![created_by.to_owned()];
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO restaurants (
                restaurant_id, name, search_key, description, address, phone, email, website,
                created_by, associated_users, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(&restaurant_id)
        .bind(&request.name)
        .bind(fold_search_key(&request.name))
        .bind(&request.description)
        .bind(&request.address)
        .bind(&request.phone)
        .bind(&request.email)
        .bind(&request.website)
        .bind(created_by)
        .bind(to_json_column(&associated_users)?)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create restaurant: {e}")))?;

        Ok(Restaurant {
            restaurant_id,
            name: request.name.clone(),
            description: request.description.clone(),
            address: request.address.clone(),
            phone: request.phone.clone(),
            email: request.email.clone(),
            website: request.website.clone(),
            created_by: created_by.to_owned(),
            associated_users,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a restaurant by business id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, restaurant_id: &str) -> AppResult<Option<Restaurant>> {
        let row = sqlx::query(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE restaurant_id = $1"
        ))
        .bind(restaurant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get restaurant: {e}")))?;

        row.map(|r| row_to_restaurant(&r)).transpose()
    }

    /// List restaurants within `scope`, ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        filter: &ListRestaurantsFilter,
        scope: &RestaurantScope,
        pagination: Pagination,
    ) -> AppResult<(Vec<Restaurant>, u64)> {
        let mut clause = WhereClause::new();
        if let Some(name) = filter.name.as_deref() {
            clause.name_contains(name);
        }
        clause.restaurant_scope("restaurant_id", scope);

        let total = count_rows(&self.pool, "restaurants", &clause).await?;
        let rows = fetch_page(
            &self.pool,
            RESTAURANT_COLUMNS,
            "restaurants",
            &clause,
            "restaurant_id ASC",
            pagination,
        )
        .await?;
        let restaurants = rows.iter().map(row_to_restaurant).collect::<AppResult<_>>()?;
        Ok((restaurants, total))
    }

    /// Apply a partial update of descriptive fields
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(
        &self,
        restaurant_id: &str,
        request: &UpdateRestaurantRequest,
    ) -> AppResult<Option<Restaurant>> {
        let Some(existing) = self.get(restaurant_id).await? else {
            return Ok(None);
        };

        let name = request.name.as_ref().unwrap_or(&existing.name);
        let description = request.description.clone().unwrap_or(existing.description);
        let address = request.address.clone().unwrap_or(existing.address);
        let phone = request.phone.clone().unwrap_or(existing.phone);
        let email = request.email.clone().unwrap_or(existing.email);
        let website = request.website.clone().unwrap_or(existing.website);

        let result = sqlx::query(
            r"
            UPDATE restaurants SET
                name = $1, search_key = $2, description = $3, address = $4, phone = $5,
                email = $6, website = $7, updated_at = $8
            WHERE restaurant_id = $9
            ",
        )
        .bind(name)
        .bind(fold_search_key(name))
        .bind(&description)
        .bind(&address)
        .bind(&phone)
        .bind(&email)
        .bind(&website)
        .bind(Utc::now().to_rfc3339())
        .bind(restaurant_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update restaurant: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(restaurant_id).await
    }

    /// Replace the member list
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn set_associated_users(
        &self,
        restaurant_id: &str,
        user_ids: &[String],
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE restaurants SET associated_users = $1, updated_at = $2
            WHERE restaurant_id = $3
            ",
        )
        .bind(to_json_column(user_ids)?)
        .bind(Utc::now().to_rfc3339())
        .bind(restaurant_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update restaurant members: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a restaurant record
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, restaurant_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM restaurants WHERE restaurant_id = $1")
            .bind(restaurant_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete restaurant: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_restaurant(row: &SqliteRow) -> AppResult<Restaurant> {
    let associated_users: Option<String> = row.get("associated_users");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Restaurant {
        restaurant_id: row.get("restaurant_id"),
        name: row.get("name"),
        description: row.get("description"),
        address: row.get("address"),
        phone: row.get("phone"),
        email: row.get("email"),
        website: row.get("website"),
        created_by: row.get("created_by"),
        associated_users: from_json_column(associated_users.as_deref())?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
