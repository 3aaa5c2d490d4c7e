// ABOUTME: Route handlers for the menu section REST API
// ABOUTME: The title filter may be passed as either title or name
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

use crate::database::menu_sections::{
    CreateMenuSectionRequest, ListMenuSectionsFilter, UpdateMenuSectionRequest,
};
use crate::errors::AppError;
use crate::pagination::Pagination;
use crate::resources::ServerResources;
use crate::routes::extract::{ValidatedJson, ValidatedQuery};

/// Query parameters for listing menu sections
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListMenuSectionsQuery {
    /// Case-insensitive title substring
    pub title: Option<String>,
    /// Alias of `title`
    pub name: Option<String>,
    /// Restrict to one restaurant
    pub restaurant_id: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

/// Menu section routes
pub struct MenuSectionRoutes;

impl MenuSectionRoutes {
    /// Create all menu section routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/menu-sections",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/menu-sections/:id",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedJson(body): ValidatedJson<CreateMenuSectionRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let section = resources.menu_sections.create(&actor, body).await?;
        Ok((StatusCode::CREATED, Json(section)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedQuery(query): ValidatedQuery<ListMenuSectionsQuery>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let filter = ListMenuSectionsFilter {
            title: query.title.or(query.name),
        };
        let page = resources
            .menu_sections
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
        let section = resources.menu_sections.find_one(&actor, &id).await?;
        Ok((StatusCode::OK, Json(section)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        ValidatedJson(body): ValidatedJson<UpdateMenuSectionRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let section = resources.menu_sections.update(&actor, &id, body).await?;
        Ok((StatusCode::OK, Json(section)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        resources.menu_sections.delete(&actor, &id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
