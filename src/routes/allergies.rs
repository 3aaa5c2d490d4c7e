// ABOUTME: Route handlers for the allergy catalogue REST API
// ABOUTME: Thin translation from HTTP to AllergyService; any authenticated user may call them
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

use crate::database::allergies::{CreateAllergyRequest, ListAllergiesFilter, UpdateAllergyRequest};
use crate::errors::AppError;
use crate::pagination::Pagination;
use crate::resources::ServerResources;
use crate::routes::extract::{ValidatedJson, ValidatedQuery};

/// Query parameters for listing allergies
#[derive(Debug, Deserialize, Default)]
pub struct ListAllergiesQuery {
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

/// Allergy routes
pub struct AllergyRoutes;

impl AllergyRoutes {
    /// Create all allergy routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/allergies",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/allergies/:id",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle POST /api/allergies
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedJson(body): ValidatedJson<CreateAllergyRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let allergy = resources.allergies.create(&actor, body).await?;
        Ok((StatusCode::CREATED, Json(allergy)).into_response())
    }

    /// Handle GET /api/allergies
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        ValidatedQuery(query): ValidatedQuery<ListAllergiesQuery>,
    ) -> Result<Response, AppError> {
        resources.authenticate(&headers)?;
        let filter = ListAllergiesFilter { name: query.name };
        let page = resources
            .allergies
            .find_all(&filter, Pagination::new(query.page, query.limit))
            .await?;
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle GET /api/allergies/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        resources.authenticate(&headers)?;
        let allergy = resources.allergies.find_one(&id).await?;
        Ok((StatusCode::OK, Json(allergy)).into_response())
    }

    /// Handle PATCH /api/allergies/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        ValidatedJson(body): ValidatedJson<UpdateAllergyRequest>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        let allergy = resources.allergies.update(&actor, &id, body).await?;
        Ok((StatusCode::OK, Json(allergy)).into_response())
    }

    /// Handle DELETE /api/allergies/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let actor = resources.authenticate(&headers)?;
        resources.allergies.delete(&actor, &id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
