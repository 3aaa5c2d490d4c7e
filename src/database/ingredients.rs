// ABOUTME: Database operations for ingredients, including sub-ingredient references and direct allergies
// ABOUTME: Provides restaurant-scoped listing and the unscoped batched lookup that allergy traversal relies on
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::filters::{
    count_rows, fetch_by_ids, fetch_page, fold_search_key, RestaurantScope, WhereClause,
};
use super::sequence::{next_business_id, EntityKind};
use super::{deserialize_nullable, from_json_column, parse_timestamp, to_json_column};
use crate::errors::{AppError, AppResult};
use crate::pagination::Pagination;

const INGREDIENT_COLUMNS: &str = "ingredient_id, ingredient_name, ingredient_allergies, \
    ingredient_image_url, sub_ingredients, categories, restaurant_id, created_at, updated_at";

/// An ingredient, possibly composed of other ingredients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Business id (`ING-######`)
    pub ingredient_id: String,
    /// Display name
    pub ingredient_name: String,
    /// Allergy ids declared directly on this ingredient
    pub ingredient_allergies: Vec<String>,
    /// Optional image reference
    pub ingredient_image_url: Option<String>,
    /// Ordered sub-ingredient ids; the graph they form may contain cycles
    pub sub_ingredients: Vec<String>,
    /// Free-form categories
    pub categories: Vec<String>,
    /// Owning restaurant; the core restaurant marks a shared ingredient
    pub restaurant_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create an ingredient
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIngredientRequest {
    /// Display name
    pub ingredient_name: String,
    /// Direct allergy ids
    #[serde(default)]
    pub ingredient_allergies: Vec<String>,
    /// Optional image reference
    pub ingredient_image_url: Option<String>,
    /// Sub-ingredient ids
    #[serde(default)]
    pub sub_ingredients: Vec<String>,
    /// Categories
    #[serde(default)]
    pub categories: Vec<String>,
    /// Owning restaurant, defaults to the core restaurant
    pub restaurant_id: Option<String>,
}

/// Partial update of an ingredient
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIngredientRequest {
    /// New display name
    pub ingredient_name: Option<String>,
    /// Replacement direct allergy ids
    pub ingredient_allergies: Option<Vec<String>>,
    /// New image reference; `null` clears it
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub ingredient_image_url: Option<Option<String>>,
    /// Replacement sub-ingredient ids
    pub sub_ingredients: Option<Vec<String>>,
    /// Replacement categories
    pub categories: Option<Vec<String>>,
    /// Rejected unless equal to the stored owner
    pub restaurant_id: Option<String>,
}

/// Filter for listing ingredients
#[derive(Debug, Clone, Default)]
pub struct ListIngredientsFilter {
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// Ingredient directly lists this allergy
    pub allergy_id: Option<String>,
    /// Ingredient carries this category
    pub category: Option<String>,
}

/// Ingredient database operations manager
pub struct IngredientsManager {
    pool: SqlitePool,
}

impl IngredientsManager {
    /// Create a new ingredients manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an ingredient owned by `restaurant_id`
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(
        &self,
        request: &CreateIngredientRequest,
        restaurant_id: &str,
    ) -> AppResult<Ingredient> {
        let ingredient_id = next_business_id(&self.pool, EntityKind::Ingredient).await?;
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO ingredients (
                ingredient_id, ingredient_name, search_key, ingredient_allergies,
                ingredient_image_url, sub_ingredients, categories, restaurant_id,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(&ingredient_id)
        .bind(&request.ingredient_name)
        .bind(fold_search_key(&request.ingredient_name))
        .bind(to_json_column(&request.ingredient_allergies)?)
        .bind(&request.ingredient_image_url)
        .bind(to_json_column(&request.sub_ingredients)?)
        .bind(to_json_column(&request.categories)?)
        .bind(restaurant_id)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create ingredient: {e}")))?;

        Ok(Ingredient {
            ingredient_id,
            ingredient_name: request.ingredient_name.clone(),
            ingredient_allergies: request.ingredient_allergies.clone(),
            ingredient_image_url: request.ingredient_image_url.clone(),
            sub_ingredients: request.sub_ingredients.clone(),
            categories: request.categories.clone(),
            restaurant_id: restaurant_id.to_owned(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get an ingredient by business id, regardless of owner
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, ingredient_id: &str) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients WHERE ingredient_id = $1"
        ))
        .bind(ingredient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))?;

        row.map(|r| row_to_ingredient(&r)).transpose()
    }

    /// Batched lookup across every owner; unknown ids are absent from the result
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn find_by_ids(&self, ingredient_ids: &[String]) -> AppResult<Vec<Ingredient>> {
        let rows = fetch_by_ids(
            &self.pool,
            INGREDIENT_COLUMNS,
            "ingredients",
            "ingredient_id",
            ingredient_ids,
        )
        .await?;
        rows.iter().map(row_to_ingredient).collect()
    }

    /// List ingredients within `scope`, ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        filter: &ListIngredientsFilter,
        scope: &RestaurantScope,
        pagination: Pagination,
    ) -> AppResult<(Vec<Ingredient>, u64)> {
        let mut clause = WhereClause::new();
        if let Some(name) = filter.name.as_deref() {
            clause.name_contains(name);
        }
        if let Some(allergy_id) = filter.allergy_id.as_deref() {
            clause.json_array_contains("ingredient_allergies", allergy_id);
        }
        if let Some(category) = filter.category.as_deref() {
            clause.json_array_contains("categories", category);
        }
        clause.restaurant_scope("restaurant_id", scope);

        let total = count_rows(&self.pool, "ingredients", &clause).await?;
        let rows = fetch_page(
            &self.pool,
            INGREDIENT_COLUMNS,
            "ingredients",
            &clause,
            "ingredient_id ASC",
            pagination,
        )
        .await?;
        let ingredients = rows.iter().map(row_to_ingredient).collect::<AppResult<_>>()?;
        Ok((ingredients, total))
    }

    /// Apply a partial update; the owning restaurant is never written
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(
        &self,
        ingredient_id: &str,
        request: &UpdateIngredientRequest,
    ) -> AppResult<Option<Ingredient>> {
        let Some(existing) = self.get(ingredient_id).await? else {
            return Ok(None);
        };

        let name = request
            .ingredient_name
            .as_ref()
            .unwrap_or(&existing.ingredient_name);
        let allergies = request
            .ingredient_allergies
            .as_ref()
            .unwrap_or(&existing.ingredient_allergies);
        let image = request
            .ingredient_image_url
            .clone()
            .unwrap_or(existing.ingredient_image_url);
        let sub_ingredients = request
            .sub_ingredients
            .as_ref()
            .unwrap_or(&existing.sub_ingredients);
        let categories = request.categories.as_ref().unwrap_or(&existing.categories);

        let result = sqlx::query(
            r"
            UPDATE ingredients SET
                ingredient_name = $1, search_key = $2, ingredient_allergies = $3,
                ingredient_image_url = $4, sub_ingredients = $5, categories = $6, updated_at = $7
            WHERE ingredient_id = $8
            ",
        )
        .bind(name)
        .bind(fold_search_key(name))
        .bind(to_json_column(allergies)?)
        .bind(&image)
        .bind(to_json_column(sub_ingredients)?)
        .bind(to_json_column(categories)?)
        .bind(Utc::now().to_rfc3339())
        .bind(ingredient_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update ingredient: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(ingredient_id).await
    }

    /// Delete an ingredient
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, ingredient_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM ingredients WHERE ingredient_id = $1")
            .bind(ingredient_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete ingredient: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_ingredient(row: &SqliteRow) -> AppResult<Ingredient> {
    let allergies: Option<String> = row.get("ingredient_allergies");
    let sub_ingredients: Option<String> = row.get("sub_ingredients");
    let categories: Option<String> = row.get("categories");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Ingredient {
        ingredient_id: row.get("ingredient_id"),
        ingredient_name: row.get("ingredient_name"),
        ingredient_allergies: from_json_column(allergies.as_deref())?,
        ingredient_image_url: row.get("ingredient_image_url"),
        sub_ingredients: from_json_column(sub_ingredients.as_deref())?,
        categories: from_json_column(categories.as_deref())?,
        restaurant_id: row.get("restaurant_id"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
