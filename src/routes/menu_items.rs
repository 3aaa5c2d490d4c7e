// ABOUTME: Route handlers for the menu item REST API
// ABOUTME: Responses carry resolved ingredient names and the rolled-up allergy list
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

use crate::database::menu_items::{
    CreateMenuItemRequest, ListMenuItemsFilter, UpdateMenuItemRequest,
};
use crate::errors::AppError;
use crate::pagination::Pagination;
use crate::resources::ServerResources;
use crate::routes::extract::{ValidatedJson, ValidatedQuery};

/// Query parameters for listing menu items
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListMenuItemsQuery {
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// Items that use this ingredient directly
    pub ingredient_id: Option<String>,
    /// Restrict to one restaurant
    pub restaurant_id: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

/// Menu item routes
pub struct MenuItemRoutes;

impl MenuItemRoutes {
    /// Create all menu item routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/menu-items",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/menu-items/:id",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedJson(body): ValidatedJson<CreateMenuItemRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let item = resources.menu_items.create(&actor, body).await?;
        Ok((StatusCode::CREATED, Json(item)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedQuery(query): ValidatedQuery<ListMenuItemsQuery>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let filter = ListMenuItemsFilter {
            name: query.name,
            ingredient_id: query.ingredient_id,
        };
        let page = resources
            .menu_items
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
        let item = resources.menu_items.find_one(&actor, &id).await?;
        Ok((StatusCode::OK, Json(item)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        ValidatedJson(body): ValidatedJson<UpdateMenuItemRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let item = resources.menu_items.update(&actor, &id, body).await?;
        Ok((StatusCode::OK, Json(item)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        resources.menu_items.delete(&actor, &id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
