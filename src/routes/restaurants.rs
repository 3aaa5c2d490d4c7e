// ABOUTME: Route handlers for restaurants and their membership sub-resource
// ABOUTME: Adding or removing a member returns 200 with the updated restaurant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;

use crate::database::restaurants::{
    CreateRestaurantRequest, ListRestaurantsFilter, UpdateRestaurantRequest,
};
use crate::errors::AppError;
use crate::pagination::Pagination;
use crate::resources::ServerResources;
use crate::routes::extract::{ValidatedJson, ValidatedQuery};
use crate::services::validation::require_non_empty;

/// Query parameters for listing restaurants
#[derive(Debug, Deserialize, Default)]
pub struct ListRestaurantsQuery {
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

/// Request body for adding a member
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserBody {
    /// User to add
    pub user_id: String,
}

/// Restaurant routes
pub struct RestaurantRoutes;

impl RestaurantRoutes {
    /// Create all restaurant routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/restaurants",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/restaurants/:id",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/restaurants/:id/users",
                get(Self::handle_list_users).post(Self::handle_add_user),
            )
            .route(
                "/api/restaurants/:id/users/:user_id",
                delete(Self::handle_remove_user),
            )
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedJson(body): ValidatedJson<CreateRestaurantRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let restaurant = resources.restaurants.create(&actor, body).await?;
        Ok((StatusCode::CREATED, Json(restaurant)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedQuery(query): ValidatedQuery<ListRestaurantsQuery>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let filter = ListRestaurantsFilter { name: query.name };
        let page = resources
            .restaurants
            .find_all(&actor, &filter, Pagination::new(query.page, query.limit))
            .await?;
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let restaurant = resources.restaurants.find_one(&actor, &id).await?;
        Ok((StatusCode::OK, Json(restaurant)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        ValidatedJson(body): ValidatedJson<UpdateRestaurantRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let restaurant = resources.restaurants.update(&actor, &id, body).await?;
        Ok((StatusCode::OK, Json(restaurant)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        resources.restaurants.delete(&actor, &id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle GET /api/restaurants/:id/users
    async fn handle_list_users(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let users = resources.restaurants.list_users(&actor, &id).await?;
        Ok((StatusCode::OK, Json(users)).into_response())
    }

    /// Handle POST /api/restaurants/:id/users
    async fn handle_add_user(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        ValidatedJson(body): ValidatedJson<AddUserBody>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        require_non_empty("userId", &body.user_id)?;
        let restaurant = resources
            .restaurants
            .add_user(&actor, &id, &body.user_id)
            .await?;
        Ok((StatusCode::OK, Json(restaurant)).into_response())
    }

    /// Handle DELETE /api/restaurants/:id/users/:user_id
    async fn handle_remove_user(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((id, user_id)): Path<(String, String)>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let restaurant = resources
            .restaurants
            .remove_user(&actor, &id, &user_id)
            .await?;
        Ok((StatusCode::OK, Json(restaurant)).into_response())
    }
}
