// ABOUTME: Route handlers for the menu REST API
// ABOUTME: The activeDay filter accepts weekday names case-insensitively and rejects anything else
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

use crate::database::menus::{CreateMenuRequest, ListMenusFilter, UpdateMenuRequest, Weekday};
use crate::errors::AppError;
use crate::pagination::Pagination;
use crate::resources::ServerResources;
use crate::routes::extract::{ValidatedJson, ValidatedQuery};

/// Query parameters for listing menus
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListMenusQuery {
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// Menus active on this weekday (`monday`..`sunday`)
    pub active_day: Option<String>,
    /// Restrict to one restaurant
    pub restaurant_id: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

/// Menu routes
pub struct MenuRoutes;

impl MenuRoutes {
    /// Create all menu routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/menus", get(Self::handle_list).post(Self::handle_create))
            .route(
                "/api/menus/:id",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedJson(body): ValidatedJson<CreateMenuRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let menu = resources.menus.create(&actor, body).await?;
        Ok((StatusCode::CREATED, Json(menu)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedQuery(query): ValidatedQuery<ListMenusQuery>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let active_day = query
            .active_day
            .as_deref()
            .map(|day| {
                Weekday::parse(day).ok_or_else(|| {
                    AppError::invalid_input(format!("activeDay '{day}' is not a weekday"))
                })
            })
            .transpose()?;
        let filter = ListMenusFilter {
            name: query.name,
            active_day,
        };
        let page = resources
            .menus
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
        let menu = resources.menus.find_one(&actor, &id).await?;
        Ok((StatusCode::OK, Json(menu)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        ValidatedJson(body): ValidatedJson<UpdateMenuRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let menu = resources.menus.update(&actor, &id, body).await?;
        Ok((StatusCode::OK, Json(menu)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        resources.menus.delete(&actor, &id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
