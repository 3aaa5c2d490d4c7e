// ABOUTME: Route handlers for the ingredient REST API, including the allergy closure endpoint
// ABOUTME: Listing honours restaurantId, allergyId, category and name filters plus core sharing
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

use crate::database::ingredients::{
    CreateIngredientRequest, ListIngredientsFilter, UpdateIngredientRequest,
};
use crate::errors::AppError;
use crate::pagination::Pagination;
use crate::resources::ServerResources;
use crate::routes::extract::{ValidatedJson, ValidatedQuery};

/// Query parameters for listing ingredients
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListIngredientsQuery {
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// Ingredients that directly list this allergy
    pub allergy_id: Option<String>,
    /// Ingredients tagged with this category
    pub category: Option<String>,
    /// Restrict to one restaurant (plus the core catalogue)
    pub restaurant_id: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

/// Ingredient routes
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/ingredients",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/ingredients/:id",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/ingredients/:id/allergies",
                get(Self::handle_allergy_closure),
            )
            .with_state(resources)
    }

    /// Handle POST /api/ingredients
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedJson(body): ValidatedJson<CreateIngredientRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let ingredient = resources.ingredients.create(&actor, body).await?;
        Ok((StatusCode::CREATED, Json(ingredient)).into_response())
    }

    /// Handle GET /api/ingredients
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedQuery(query): ValidatedQuery<ListIngredientsQuery>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let filter = ListIngredientsFilter {
            name: query.name,
            allergy_id: query.allergy_id,
            category: query.category,
        };
        let page = resources
            .ingredients
            .find_all(
                &actor,
                &filter,
                query.restaurant_id.as_deref(),
                Pagination::new(query.page, query.limit),
            )
            .await?;
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle GET /api/ingredients/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let ingredient = resources.ingredients.find_one(&actor, &id).await?;
        Ok((StatusCode::OK, Json(ingredient)).into_response())
    }

    /// Handle GET /api/ingredients/:id/allergies
    async fn handle_allergy_closure(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let closure = resources.ingredients.allergy_closure(&actor, &id).await?;
        Ok((StatusCode::OK, Json(closure)).into_response())
    }

    /// Handle PATCH /api/ingredients/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        ValidatedJson(body): ValidatedJson<UpdateIngredientRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let ingredient = resources.ingredients.update(&actor, &id, body).await?;
        Ok((StatusCode::OK, Json(ingredient)).into_response())
    }

    /// Handle DELETE /api/ingredients/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        resources.ingredients.delete(&actor, &id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
