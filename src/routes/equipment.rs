// ABOUTME: Route handlers for the equipment catalogue REST API
// ABOUTME: Reads need any authenticated user; EquipmentService enforces admin for writes
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

use crate::database::equipment::{
    CreateEquipmentRequest, ListEquipmentFilter, UpdateEquipmentRequest,
};
use crate::errors::AppError;
use crate::pagination::Pagination;
use crate::resources::ServerResources;
use crate::routes::extract::{ValidatedJson, ValidatedQuery};

/// Query parameters for listing equipment
#[derive(Debug, Deserialize, Default)]
pub struct ListEquipmentQuery {
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

/// Equipment routes
pub struct EquipmentRoutes;

impl EquipmentRoutes {
    /// Create all equipment routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/equipment",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/equipment/:id",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedJson(body): ValidatedJson<CreateEquipmentRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let equipment = resources.equipment.create(&actor, body).await?;
        Ok((StatusCode::CREATED, Json(equipment)).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedQuery(query): ValidatedQuery<ListEquipmentQuery>,
    ) -> Result<Response, AppError> {
        resources.authenticate(&headers)?;
        let filter = ListEquipmentFilter { name: query.name };
        let page = resources
            .equipment
            .find_all(&filter, Pagination::new(query.page, query.limit))
            .await?;
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        resources.authenticate(&headers)?;
        let equipment = resources.equipment.find_one(&id).await?;
        Ok((StatusCode::OK, Json(equipment)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        ValidatedJson(body): ValidatedJson<UpdateEquipmentRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let equipment = resources.equipment.update(&actor, &id, body).await?;
        Ok((StatusCode::OK, Json(equipment)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        resources.equipment.delete(&actor, &id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
