// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Liveness needs no auth; readiness also pings the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::warn;

use crate::constants::service_names::MENU_TRAINING_SERVER;
use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health_handler))
            .route("/ready", get(Self::ready_handler))
            .with_state(resources)
    }

    async fn health_handler() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "service": MENU_TRAINING_SERVER,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn ready_handler(
        State(resources): State<Arc<ServerResources>>,
    ) -> (StatusCode, Json<Value>) {
        match sqlx::query("SELECT 1")
            .execute(resources.database.pool())
            .await
        {
            Ok(_) => (
                StatusCode::OK,
                Json(json!({
                    "status": "ready",
                    "timestamp": chrono::Utc::now().to_rfc3339()
                })),
            ),
            Err(e) => {
                warn!("Readiness check failed: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "status": "unavailable" })),
                )
            }
        }
    }
}
