// ABOUTME: Database operations for user records on the membership side of restaurant access
// ABOUTME: Reads users and maintains each user's associated_restaurants JSON list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::filters::fetch_by_ids;
use super::{from_json_column, parse_timestamp, to_json_column};
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserRole};

const USER_COLUMNS: &str = "id, email, name, role, associated_restaurants, created_at, updated_at";

/// User database operations manager
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new users manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user record
    ///
    /// Provisioning belongs to the identity provider; this is for tooling and tests.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, user: &User) -> AppResult<()> {
        let restaurants_json = to_json_column(&user.associated_restaurants)?;

        sqlx::query(
            r"
            INSERT INTO users (
                id, email, name, role, associated_restaurants, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(&restaurants_json)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;

        Ok(())
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, user_id: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get every existing user among `user_ids`, in `user_ids` order
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_many(&self, user_ids: &[String]) -> AppResult<Vec<User>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = fetch_by_ids(&self.pool, USER_COLUMNS, "users", "id", user_ids).await?;
        let mut users = rows.iter().map(row_to_user).collect::<AppResult<Vec<_>>>()?;
        users.sort_by_key(|u| user_ids.iter().position(|id| *id == u.id));
        Ok(users)
    }

    /// Add a restaurant to the user's associations; returns false if the user does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn add_restaurant(&self, user_id: &str, restaurant_id: &str) -> AppResult<bool> {
        let Some(user) = self.get(user_id).await? else {
            return Ok(false);
        };
        if user.associated_restaurants.iter().any(|r| r == restaurant_id) {
            return Ok(true);
        }

        let mut restaurants = user.associated_restaurants;
        restaurants.push(restaurant_id.to_owned());
        self.set_restaurants(user_id, &restaurants).await
    }

    /// Remove a restaurant from the user's associations; returns false if the user does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn remove_restaurant(&self, user_id: &str, restaurant_id: &str) -> AppResult<bool> {
        let Some(user) = self.get(user_id).await? else {
            return Ok(false);
        };

        let restaurants: Vec<String> = user
            .associated_restaurants
            .into_iter()
            .filter(|r| r != restaurant_id)
            .collect();
        self.set_restaurants(user_id, &restaurants).await
    }

    async fn set_restaurants(&self, user_id: &str, restaurants: &[String]) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE users SET associated_restaurants = $1, updated_at = $2
            WHERE id = $3
            ",
        )
        .bind(to_json_column(restaurants)?)
        .bind(Utc::now().to_rfc3339())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update user restaurants: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to a User struct
fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let role: String = row.get("role");
    let restaurants: Option<String> = row.get("associated_restaurants");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        role: UserRole::parse(&role),
        associated_restaurants: from_json_column(restaurants.as_deref())?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
