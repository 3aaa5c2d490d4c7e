// ABOUTME: Database operations for recipes with ordered steps stored as a JSON document column
// ABOUTME: Supports filtering by ingredient or equipment used in any step and by maximum prep time
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

const RECIPE_COLUMNS: &str = "recipe_id, recipe_name, recipe_description, recipe_image_url, \
    recipe_servings, recipe_prep_time, recipe_total_time, recipe_steps, restaurant_id, \
    created_at, updated_at";

const STEP_USES_INGREDIENT: &str = "EXISTS (SELECT 1 FROM json_each(recipe_steps) AS step, \
    json_each(step.value, '$.stepIngredientItems') AS item \
    WHERE json_extract(item.value, '$.ingredientId') = ?)";

const STEP_USES_EQUIPMENT: &str = "EXISTS (SELECT 1 FROM json_each(recipe_steps) AS step, \
    json_each(step.value, '$.stepEquipment') AS eq WHERE eq.value = ?)";

/// Ingredient quantity used by a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepIngredientItem {
    /// Referenced ingredient id
    pub ingredient_id: String,
    /// Free-form measure, e.g. "cup"
    pub ingredient_measure: Option<String>,
    /// Quantity, must be positive
    pub ingredient_units: f64,
}

/// One preparation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    /// Instruction text
    pub step_text: String,
    /// Equipment ids used in this step
    #[serde(default)]
    pub step_equipment: Vec<String>,
    /// Ingredient quantities used in this step
    #[serde(default)]
    pub step_ingredient_items: Vec<StepIngredientItem>,
    /// Optional image reference
    pub step_image_url: Option<String>,
    /// Position; filled with the array index when absent
    pub order: Option<u32>,
}

/// A restaurant recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Business id (`RCP-######`)
    pub recipe_id: String,
    /// Display name
    pub recipe_name: String,
    /// Optional description
    pub recipe_description: Option<String>,
    /// Optional image reference
    pub recipe_image_url: Option<String>,
    /// Number of servings
    pub recipe_servings: i64,
    /// Preparation time in minutes
    pub recipe_prep_time: i64,
    /// Total time in minutes
    pub recipe_total_time: i64,
    /// Ordered steps
    pub recipe_steps: Vec<RecipeStep>,
    /// Owning restaurant
    pub restaurant_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create a recipe
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    /// Display name
    pub recipe_name: String,
    /// Optional description
    pub recipe_description: Option<String>,
    /// Optional image reference
    pub recipe_image_url: Option<String>,
    /// Number of servings
    pub recipe_servings: i64,
    /// Preparation time in minutes
    pub recipe_prep_time: i64,
    /// Total time in minutes
    pub recipe_total_time: i64,
    /// Ordered steps
    #[serde(default)]
    pub recipe_steps: Vec<RecipeStep>,
    /// Owning restaurant
    pub restaurant_id: String,
}

/// Partial update of a recipe
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    /// New display name
    pub recipe_name: Option<String>,
    /// New description; `null` clears it
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub recipe_description: Option<Option<String>>,
    /// New image reference; `null` clears it
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub recipe_image_url: Option<Option<String>>,
    /// New servings
    pub recipe_servings: Option<i64>,
    /// New preparation time
    pub recipe_prep_time: Option<i64>,
    /// New total time
    pub recipe_total_time: Option<i64>,
    /// Replacement steps
    pub recipe_steps: Option<Vec<RecipeStep>>,
    /// Rejected unless equal to the stored owner
    pub restaurant_id: Option<String>,
}

/// Filter for listing recipes
#[derive(Debug, Clone, Default)]
pub struct ListRecipesFilter {
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// Some step uses this ingredient
    pub ingredient_id: Option<String>,
    /// Some step uses this equipment
    pub equipment_id: Option<String>,
    /// Preparation time at most this many minutes
    pub max_prep_time: Option<i64>,
}

/// Fill missing step `order` values with their array index
#[must_use]
pub fn normalize_steps(steps: &[RecipeStep]) -> Vec<RecipeStep> {
    steps
        .iter()
        .zip(0_u32..)
        .map(|(step, index)| RecipeStep {
            order: Some(step.order.unwrap_or(index)),
            ..step.clone()
        })
        .collect()
}

/// Recipe database operations manager
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a recipe with the next `RCP-` id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, request: &CreateRecipeRequest) -> AppResult<Recipe> {
        let recipe_id = next_business_id(&self.pool, EntityKind::Recipe).await?;
        let steps = normalize_steps(&request.recipe_steps);
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO recipes (
                recipe_id, recipe_name, search_key, recipe_description, recipe_image_url,
                recipe_servings, recipe_prep_time, recipe_total_time, recipe_steps, restaurant_id,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(&recipe_id)
        .bind(&request.recipe_name)
        .bind(fold_search_key(&request.recipe_name))
        .bind(&request.recipe_description)
        .bind(&request.recipe_image_url)
        .bind(request.recipe_servings)
        .bind(request.recipe_prep_time)
        .bind(request.recipe_total_time)
        .bind(to_json_column(&steps)?)
        .bind(&request.restaurant_id)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;

        Ok(Recipe {
            recipe_id,
            recipe_name: request.recipe_name.clone(),
            recipe_description: request.recipe_description.clone(),
            recipe_image_url: request.recipe_image_url.clone(),
            recipe_servings: request.recipe_servings,
            recipe_prep_time: request.recipe_prep_time,
            recipe_total_time: request.recipe_total_time,
            recipe_steps: steps,
            restaurant_id: request.restaurant_id.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a recipe by business id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, recipe_id: &str) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE recipe_id = $1"
        ))
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.map(|r| row_to_recipe(&r)).transpose()
    }

    /// List recipes within `scope`, ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        filter: &ListRecipesFilter,
        scope: &RestaurantScope,
        pagination: Pagination,
    ) -> AppResult<(Vec<Recipe>, u64)> {
        let mut clause = WhereClause::new();
        if let Some(name) = filter.name.as_deref() {
            clause.name_contains(name);
        }
        if let Some(ingredient_id) = filter.ingredient_id.as_deref() {
            clause.raw(STEP_USES_INGREDIENT, ingredient_id);
        }
        if let Some(equipment_id) = filter.equipment_id.as_deref() {
            clause.raw(STEP_USES_EQUIPMENT, equipment_id);
        }
        if let Some(max_prep_time) = filter.max_prep_time {
            clause.at_most("recipe_prep_time", max_prep_time);
        }
        clause.restaurant_scope("restaurant_id", scope);

        let total = count_rows(&self.pool, "recipes", &clause).await?;
        let rows = fetch_page(
            &self.pool,
            RECIPE_COLUMNS,
            "recipes",
            &clause,
            "recipe_id ASC",
            pagination,
        )
        .await?;
        let recipes = rows.iter().map(row_to_recipe).collect::<AppResult<_>>()?;
        Ok((recipes, total))
    }

    /// Apply a partial update; the owning restaurant is never written
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(
        &self,
        recipe_id: &str,
        request: &UpdateRecipeRequest,
    ) -> AppResult<Option<Recipe>> {
        let Some(existing) = self.get(recipe_id).await? else {
            return Ok(None);
        };

        let name = request.recipe_name.as_ref().unwrap_or(&existing.recipe_name);
        let description = request
            .recipe_description
            .clone()
            .unwrap_or(existing.recipe_description);
        let image = request
            .recipe_image_url
            .clone()
            .unwrap_or(existing.recipe_image_url);
        let servings = request.recipe_servings.unwrap_or(existing.recipe_servings);
        let prep_time = request.recipe_prep_time.unwrap_or(existing.recipe_prep_time);
        let total_time = request
            .recipe_total_time
            .unwrap_or(existing.recipe_total_time);
        let steps = request
            .recipe_steps
            .as_deref()
            .map_or(existing.recipe_steps, normalize_steps);

        let result = sqlx::query(
            r"
            UPDATE recipes SET
                recipe_name = $1, search_key = $2, recipe_description = $3,
                recipe_image_url = $4, recipe_servings = $5, recipe_prep_time = $6,
                recipe_total_time = $7, recipe_steps = $8, updated_at = $9
            WHERE recipe_id = $10
            ",
        )
        .bind(name)
        .bind(fold_search_key(name))
        .bind(&description)
        .bind(&image)
        .bind(servings)
        .bind(prep_time)
        .bind(total_time)
        .bind(to_json_column(&steps)?)
        .bind(Utc::now().to_rfc3339())
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(recipe_id).await
    }

    /// Delete a recipe
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, recipe_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let steps: Option<String> = row.get("recipe_steps");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Recipe {
        recipe_id: row.get("recipe_id"),
        recipe_name: row.get("recipe_name"),
        recipe_description: row.get("recipe_description"),
        recipe_image_url: row.get("recipe_image_url"),
        recipe_servings: row.get("recipe_servings"),
        recipe_prep_time: row.get("recipe_prep_time"),
        recipe_total_time: row.get("recipe_total_time"),
        recipe_steps: from_json_column(steps.as_deref())?,
        restaurant_id: row.get("restaurant_id"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(text: &str, order: Option<u32>) -> RecipeStep {
        RecipeStep {
            step_text: text.to_owned(),
            step_equipment: Vec::new(),
            step_ingredient_items: Vec::new(),
            step_image_url: None,
            order,
        }
    }

    #[test]
    fn test_normalize_steps_fills_missing_order() {
        let steps = normalize_steps(&[
            step("toast", None),
            step("spread", Some(7)),
            step("serve", None),
        ]);
        let orders: Vec<_> = steps.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![Some(0), Some(7), Some(2)]);
    }

    #[test]
    fn test_step_wire_names() {
        let json = serde_json::json!({
            "stepText": "Mix",
            "stepIngredientItems": [{"ingredientId": "ING-000001", "ingredientUnits": 2.0}]
        });
        let parsed: RecipeStep = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.step_ingredient_items[0].ingredient_id, "ING-000001");
        assert!(parsed.step_equipment.is_empty());
        assert_eq!(parsed.order, None);
    }
}
