// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory database, user seeding, token minting and router construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `menu_training_server`

use std::sync::{Arc, Once};

use anyhow::Result;
use axum::Router;
use menu_training_server::{
    auth::AuthManager,
    config::{AuthConfig, DatabaseConfig, Environment, HttpConfig, ServerConfig},
    database::{restaurants::CreateRestaurantRequest, Database},
    models::{Actor, User, UserRole},
    resources::ServerResources,
    routes::build_router,
};

static INIT_LOGGER: Once = Once::new();

/// Secret used by every test token
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Configuration suitable for tests
pub fn test_config() -> ServerConfig {
    ServerConfig {
        environment: Environment::Testing,
        http: HttpConfig {
            host: "127.0.0.1".to_owned(),
            port: 8081,
            cors_origins: vec!["*".to_owned()],
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_owned(),
        },
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_owned(),
            token_expiry_hours: 1,
        },
    }
}

/// Create test authentication manager
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(TEST_JWT_SECRET.as_bytes(), 1)
}

/// Server resources over a fresh in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    Ok(Arc::new(ServerResources::new(
        database,
        create_test_auth_manager(),
        Arc::new(test_config()),
    )))
}

/// Full application router for HTTP tests
pub fn create_test_router(resources: &Arc<ServerResources>) -> Router {
    build_router(resources.clone())
}

/// Insert a user record and return the matching actor
pub async fn seed_user(database: &Database, id: &str, role: UserRole) -> Result<Actor> {
    let mut user = User::new(id, format!("{id}@example.com"), role);
    user.name = Some(format!("User {id}"));
    database.users().create(&user).await?;
    Ok(Actor::new(id, role))
}

/// Create a restaurant through the service so both membership sides are written
pub async fn seed_restaurant(
    resources: &ServerResources,
    owner: &Actor,
    name: &str,
) -> Result<String> {
    let restaurant = resources
        .restaurants
        .create(
            owner,
            CreateRestaurantRequest {
                name: name.to_owned(),
                description: None,
                address: None,
                phone: None,
                email: None,
                website: None,
            },
        )
        .await?;
    Ok(restaurant.restaurant_id)
}

/// Bearer header value for `actor`
pub fn bearer(actor: &Actor) -> String {
    let token = create_test_auth_manager()
        .generate_token(&actor.id, actor.role)
        .unwrap();
    format!("Bearer {token}")
}
