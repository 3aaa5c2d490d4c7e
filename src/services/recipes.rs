// ABOUTME: Recipe lifecycle gated by restaurant membership, with step and quantity validation
// ABOUTME: Reads resolve every step ingredient item's name in one batched lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{info, instrument};

use super::access::AccessPolicy;
use super::enrichment::{EnrichedRecipe, Enricher};
use super::ensure_same_restaurant;
use super::validation::{
    require_at_least, require_non_empty, require_non_empty_if_present, require_positive,
};
use crate::database::recipes::{
    CreateRecipeRequest, ListRecipesFilter, Recipe, RecipeStep, UpdateRecipeRequest,
};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Actor;
use crate::pagination::{Page, Pagination};

/// Recipe operations
#[derive(Clone)]
pub struct RecipeService {
    database: Database,
    access: AccessPolicy,
    enricher: Enricher,
}

impl RecipeService {
    /// Create the service
    #[must_use]
    pub fn new(database: Database, access: AccessPolicy, enricher: Enricher) -> Self {
        Self {
            database,
            access,
            enricher,
        }
    }

    /// Create a recipe in a restaurant the actor belongs to
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` or `PermissionDenied`
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateRecipeRequest,
    ) -> AppResult<EnrichedRecipe> {
        require_non_empty("recipeName", &request.recipe_name)?;
        require_non_empty("restaurantId", &request.restaurant_id)?;
        require_at_least("recipeServings", request.recipe_servings, 1)?;
        require_at_least("recipePrepTime", request.recipe_prep_time, 0)?;
        require_at_least("recipeTotalTime", request.recipe_total_time, 0)?;
        validate_steps(&request.recipe_steps)?;
        self.access
            .ensure_access(actor, &request.restaurant_id)
            .await?;

        let recipe = self.database.recipes().create(&request).await?;
        info!(
            recipe_id = %recipe.recipe_id,
            restaurant_id = %recipe.restaurant_id,
            steps = recipe.recipe_steps.len(),
            "Recipe created"
        );
        self.enrich_one(recipe).await
    }

    /// List recipes visible to `actor`
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for an explicit restaurant the actor cannot access
    #[instrument(skip(self, filter), fields(user_id = %actor.id))]
    pub async fn find_all(
        &self,
        actor: &Actor,
        filter: &ListRecipesFilter,
        restaurant_id: Option<&str>,
        pagination: Pagination,
    ) -> AppResult<Page<EnrichedRecipe>> {
        let scope = self.access.tenant_scope(actor, restaurant_id).await?;
        if scope.is_empty() {
            return Ok(Page::empty(pagination));
        }

        let (recipes, total) = self
            .database
            .recipes()
            .list(filter, &scope, pagination)
            .await?;
        let enriched = self.enricher.enrich_recipes(recipes).await?;
        Ok(Page::new(enriched, total, pagination))
    }

    /// Get one recipe
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn find_one(&self, actor: &Actor, recipe_id: &str) -> AppResult<EnrichedRecipe> {
        let recipe = self.load(recipe_id).await?;
        self.access
            .ensure_access(actor, &recipe.restaurant_id)
            .await?;
        self.enrich_one(recipe).await
    }

    /// Partially update a recipe
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, `PermissionDenied` or `InvalidInput`
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn update(
        &self,
        actor: &Actor,
        recipe_id: &str,
        request: UpdateRecipeRequest,
    ) -> AppResult<EnrichedRecipe> {
        let existing = self.load(recipe_id).await?;
        self.access
            .ensure_access(actor, &existing.restaurant_id)
            .await?;
        ensure_same_restaurant(&existing.restaurant_id, request.restaurant_id.as_deref())?;
        require_non_empty_if_present("recipeName", request.recipe_name.as_deref())?;
        if let Some(servings) = request.recipe_servings {
            require_at_least("recipeServings", servings, 1)?;
        }
        if let Some(prep_time) = request.recipe_prep_time {
            require_at_least("recipePrepTime", prep_time, 0)?;
        }
        if let Some(total_time) = request.recipe_total_time {
            require_at_least("recipeTotalTime", total_time, 0)?;
        }
        if let Some(steps) = &request.recipe_steps {
            validate_steps(steps)?;
        }

        let updated = self
            .database
            .recipes()
            .update(recipe_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))?;
        info!(recipe_id, "Recipe updated");
        self.enrich_one(updated).await
    }

    /// Delete a recipe
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn delete(&self, actor: &Actor, recipe_id: &str) -> AppResult<()> {
        let existing = self.load(recipe_id).await?;
        self.access
            .ensure_access(actor, &existing.restaurant_id)
            .await?;

        if !self.database.recipes().delete(recipe_id).await? {
            return Err(AppError::not_found(format!("Recipe {recipe_id}")));
        }
        info!(recipe_id, "Recipe deleted");
        Ok(())
    }

    async fn load(&self, recipe_id: &str) -> AppResult<Recipe> {
        self.database
            .recipes()
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))
    }

    async fn enrich_one(&self, recipe: Recipe) -> AppResult<EnrichedRecipe> {
        self.enricher
            .enrich_recipes(vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("Recipe enrichment returned no result"))
    }
}

fn validate_steps(steps: &[RecipeStep]) -> AppResult<()> {
    for (index, step) in steps.iter().enumerate() {
        require_non_empty(&format!("recipeSteps[{index}].stepText"), &step.step_text)?;
        for item in &step.step_ingredient_items {
            require_non_empty(
                &format!("recipeSteps[{index}].stepIngredientItems.ingredientId"),
                &item.ingredient_id,
            )?;
            require_positive(
                &format!("recipeSteps[{index}].stepIngredientItems.ingredientUnits"),
                item.ingredient_units,
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::recipes::StepIngredientItem;

    #[test]
    fn test_validate_steps_rejects_zero_units() {
        let step = RecipeStep {
            step_text: "Slice".to_owned(),
            step_equipment: Vec::new(),
            step_ingredient_items: vec![StepIngredientItem {
                ingredient_id: "ING-000001".to_owned(),
                ingredient_measure: None,
                ingredient_units: 0.0,
            }],
            step_image_url: None,
            order: None,
        };
        let err = validate_steps(&[step]).unwrap_err();
        assert!(err.message.contains("ingredientUnits"));
    }
}
