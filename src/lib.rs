// ABOUTME: Main library entry point for the menu training back office API
// ABOUTME: Multi-tenant restaurant catalogue of menus, recipes, ingredients and allergies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Menu Training Server
//!
//! A REST back office that restaurant staff use to maintain the catalogue
//! they train on: allergies, equipment, ingredients, menu items, menu
//! sections, menus and recipes, all scoped to restaurants.
//!
//! ## Architecture
//!
//! - **Routes**: thin axum handlers that authenticate and delegate
//! - **Services**: access policy, validation and read-time enrichment
//! - **Database**: one `SQLite` manager per entity
//!
//! Ingredients owned by the core restaurant are shared with every tenant,
//! and menu items report allergies rolled up through sub-ingredients.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use menu_training_server::config::environment::ServerConfig;
//! use menu_training_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Menu training server configured on port {}", config.http.port);
//!     Ok(())
//! }
//! ```

/// Bearer JWT verification
pub mod auth;
/// Environment-driven configuration
pub mod config;
/// Named constants and environment lookups
pub mod constants;
/// Persistence managers
pub mod database;
/// Unified error type and HTTP mapping
pub mod errors;
/// Structured logging setup
pub mod logging;
/// HTTP middleware helpers
pub mod middleware;
/// Identity models
pub mod models;
/// Page parameters and list envelopes
pub mod pagination;
/// Shared server state
pub mod resources;
/// HTTP routes
pub mod routes;
/// Domain services
pub mod services;
