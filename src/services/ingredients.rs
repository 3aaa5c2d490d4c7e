// ABOUTME: Ingredient lifecycle with core-catalogue sharing and restaurant-scoped access control
// ABOUTME: Returns ingredient views carrying derived allergies and sub-ingredient names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{info, instrument};

use super::access::AccessPolicy;
use super::enrichment::{AllergyClosure, Enricher, IngredientView};
use super::validation::{require_non_empty, require_non_empty_if_present};
use super::ensure_same_restaurant;
use crate::constants::tenancy::{is_core_restaurant, CORE_RESTAURANT_ID};
use crate::database::ingredients::{
    CreateIngredientRequest, Ingredient, ListIngredientsFilter, UpdateIngredientRequest,
};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Actor;
use crate::pagination::{Page, Pagination};

/// Ingredient operations
#[derive(Clone)]
pub struct IngredientService {
    database: Database,
    access: AccessPolicy,
    enricher: Enricher,
}

impl IngredientService {
    /// Create the service
    #[must_use]
    pub fn new(database: Database, access: AccessPolicy, enricher: Enricher) -> Self {
        Self {
            database,
            access,
            enricher,
        }
    }

    /// Create an ingredient; core ingredients need an admin
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name, `PermissionDenied` without access
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateIngredientRequest,
    ) -> AppResult<IngredientView> {
        require_non_empty("ingredientName", &request.ingredient_name)?;

        let restaurant_id = request
            .restaurant_id
            .clone()
            .unwrap_or_else(|| CORE_RESTAURANT_ID.to_owned());
        self.ensure_can_modify(actor, &restaurant_id).await?;

        let ingredient = self
            .database
            .ingredients()
            .create(&request, &restaurant_id)
            .await?;
        info!(
            ingredient_id = %ingredient.ingredient_id,
            restaurant_id = %ingredient.restaurant_id,
            "Ingredient created"
        );
        self.view(ingredient).await
    }

    /// List ingredients visible to `actor`
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for an explicit restaurant the actor cannot access
    #[instrument(skip(self, filter), fields(user_id = %actor.id))]
    pub async fn find_all(
        &self,
        actor: &Actor,
        filter: &ListIngredientsFilter,
        restaurant_id: Option<&str>,
        pagination: Pagination,
    ) -> AppResult<Page<IngredientView>> {
        let scope = self.access.ingredient_scope(actor, restaurant_id).await?;
        if scope.is_empty() {
            return Ok(Page::empty(pagination));
        }

        let (ingredients, total) = self
            .database
            .ingredients()
            .list(filter, &scope, pagination)
            .await?;
        let views = self.enricher.ingredient_views(ingredients).await?;
        Ok(Page::new(views, total, pagination))
    }

    /// Get one ingredient; core ingredients are readable by everyone
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn find_one(&self, actor: &Actor, ingredient_id: &str) -> AppResult<IngredientView> {
        let ingredient = self.load_readable(actor, ingredient_id).await?;
        self.view(ingredient).await
    }

    /// Full and derived allergy sets of one ingredient
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn allergy_closure(
        &self,
        actor: &Actor,
        ingredient_id: &str,
    ) -> AppResult<AllergyClosure> {
        let ingredient = self.load_readable(actor, ingredient_id).await?;
        self.enricher.allergy_closure(&ingredient).await
    }

    /// Partially update an ingredient; the owning restaurant cannot change
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, `PermissionDenied` or `InvalidInput`
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn update(
        &self,
        actor: &Actor,
        ingredient_id: &str,
        request: UpdateIngredientRequest,
    ) -> AppResult<IngredientView> {
        let existing = self.load(ingredient_id).await?;
        self.ensure_can_modify(actor, &existing.restaurant_id).await?;
        ensure_same_restaurant(&existing.restaurant_id, request.restaurant_id.as_deref())?;
        require_non_empty_if_present("ingredientName", request.ingredient_name.as_deref())?;

        let updated = self
            .database
            .ingredients()
            .update(ingredient_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient {ingredient_id}")))?;
        info!(ingredient_id, "Ingredient updated");
        self.view(updated).await
    }

    /// Delete an ingredient
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn delete(&self, actor: &Actor, ingredient_id: &str) -> AppResult<()> {
        let existing = self.load(ingredient_id).await?;
        self.ensure_can_modify(actor, &existing.restaurant_id).await?;

        if !self.database.ingredients().delete(ingredient_id).await? {
            return Err(AppError::not_found(format!("Ingredient {ingredient_id}")));
        }
        info!(ingredient_id, "Ingredient deleted");
        Ok(())
    }

    async fn load(&self, ingredient_id: &str) -> AppResult<Ingredient> {
        self.database
            .ingredients()
            .get(ingredient_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient {ingredient_id}")))
    }

    async fn load_readable(&self, actor: &Actor, ingredient_id: &str) -> AppResult<Ingredient> {
        let ingredient = self.load(ingredient_id).await?;
        if !is_core_restaurant(&ingredient.restaurant_id) {
            self.access
                .ensure_access(actor, &ingredient.restaurant_id)
                .await?;
        }
        Ok(ingredient)
    }

    async fn ensure_can_modify(&self, actor: &Actor, restaurant_id: &str) -> AppResult<()> {
        if is_core_restaurant(restaurant_id) {
            if actor.is_admin() {
                return Ok(());
            }
            return Err(
                AppError::forbidden("Only administrators can modify core ingredients")
                    .with_user_id(actor.id.clone()),
            );
        }
        self.access.ensure_access(actor, restaurant_id).await
    }

    async fn view(&self, ingredient: Ingredient) -> AppResult<IngredientView> {
        self.enricher
            .ingredient_views(vec![ingredient])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("Ingredient enrichment returned no result"))
    }
}
