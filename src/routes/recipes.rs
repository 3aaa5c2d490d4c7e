// ABOUTME: Route handlers for the recipe REST API
// ABOUTME: Supports ingredient, equipment and maximum prep time filters on listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::database::recipes::{CreateRecipeRequest, ListRecipesFilter, UpdateRecipeRequest};
use crate::errors::AppError;
use crate::pagination::Pagination;
use crate::resources::ServerResources;
use crate::routes::extract::{ValidatedJson, ValidatedQuery};

/// Query parameters for listing recipes
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListRecipesQuery {
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// Recipes with a step using this ingredient
    pub ingredient_id: Option<String>,
    /// Recipes with a step using this equipment
    pub equipment_id: Option<String>,
    /// Upper bound on prep time in minutes
    pub max_prep_time: Option<i64>,
    /// Restrict to one restaurant
    pub restaurant_id: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

/// Recipe routes
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/recipes/:id",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedJson(body): ValidatedJson<CreateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let recipe = resources.recipes.create(&actor, body).await?;
        Ok((StatusCode::CREATED, Json(recipe)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedQuery(query): ValidatedQuery<ListRecipesQuery>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let filter = ListRecipesFilter {
            name: query.name,
            ingredient_id: query.ingredient_id,
            equipment_id: query.equipment_id,
            max_prep_time: query.max_prep_time,
        };
        let page = resources
            .recipes
            .find_all(
                &actor,
                &filter,
                query.restaurant_id.as_deref(),
                Pagination::new(query.page, query.limit),
            )
            .await?;
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let recipe = resources.recipes.find_one(&actor, &id).await?;
        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        ValidatedJson(body): ValidatedJson<UpdateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let recipe = resources.recipes.update(&actor, &id, body).await?;
        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        resources.recipes.delete(&actor, &id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
