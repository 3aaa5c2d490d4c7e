// ABOUTME: Route module organization for the menu training HTTP API
// ABOUTME: Assembles per-resource routers and applies request-id, tracing and CORS layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the menu training server
//!
//! Each domain module contains only route definitions and thin handler
//! functions that authenticate the caller and delegate to a service.

/// Allergy catalogue routes
pub mod allergies;
/// Equipment catalogue routes
pub mod equipment;
/// Extractors mapping decode failures to API errors
pub mod extract;
/// Health check and readiness routes
pub mod health;
/// Ingredient routes
pub mod ingredients;
/// Menu item routes
pub mod menu_items;
/// Menu section routes
pub mod menu_sections;
/// Menu routes
pub mod menus;
/// Recipe routes
pub mod recipes;
/// Restaurant and membership routes
pub mod restaurants;

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, response::Response, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, Span};

pub use allergies::AllergyRoutes;
pub use equipment::EquipmentRoutes;
pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use menu_items::MenuItemRoutes;
pub use menu_sections::MenuSectionRoutes;
pub use menus::MenuRoutes;
pub use recipes::RecipeRoutes;
pub use restaurants::RestaurantRoutes;

use crate::middleware::{create_request_span, setup_cors};
use crate::resources::ServerResources;

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config);

    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(AllergyRoutes::routes(resources.clone()))
        .merge(EquipmentRoutes::routes(resources.clone()))
        .merge(IngredientRoutes::routes(resources.clone()))
        .merge(MenuItemRoutes::routes(resources.clone()))
        .merge(MenuSectionRoutes::routes(resources.clone()))
        .merge(MenuRoutes::routes(resources.clone()))
        .merge(RecipeRoutes::routes(resources.clone()))
        .merge(RestaurantRoutes::routes(resources))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| create_request_span(request))
                .on_response(|response: &Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    debug!(latency_ms = latency.as_millis(), "Request completed");
                }),
        )
        // Registered after the trace layer so the id is set before the span is created
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
}
