// ABOUTME: Integration tests for environment-driven server configuration
// ABOUTME: Mutates process environment, so every test runs serially
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use menu_training_server::config::environment::{Environment, ServerConfig};
use menu_training_server::errors::ErrorCode;
use serial_test::serial;

const VARS: [&str; 6] = [
    "ENVIRONMENT",
    "JWT_SECRET",
    "HTTP_PORT",
    "HOST",
    "DATABASE_URL",
    "CORS_ORIGINS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_development_defaults() {
    clear_env();
    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.http.port, 8081);
    assert_eq!(config.http.cors_origins, vec!["*"]);
    assert!(config.database.url.starts_with("sqlite:"));
    assert!(!config.auth.jwt_secret.is_empty());
}

#[test]
#[serial]
fn test_overrides_from_environment() {
    clear_env();
    env::set_var("HTTP_PORT", "9090");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("CORS_ORIGINS", "http://localhost:3000, https://staff.example.com");
    env::set_var("JWT_SECRET", "from-env");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http.port, 9090);
    assert_eq!(config.database.url, "sqlite::memory:");
    assert_eq!(
        config.http.cors_origins,
        vec!["http://localhost:3000", "https://staff.example.com"]
    );
    assert_eq!(config.auth.jwt_secret, "from-env");
    assert!(!config.summary().contains("from-env"));
    clear_env();
}

#[test]
#[serial]
fn test_production_requires_jwt_secret() {
    clear_env();
    env::set_var("ENVIRONMENT", "production");

    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);

    env::set_var("JWT_SECRET", "prod-secret");
    let config = ServerConfig::from_env().unwrap();
    assert!(config.environment.is_production());
    clear_env();
}

#[test]
#[serial]
fn test_non_sqlite_database_rejected() {
    clear_env();
    env::set_var("DATABASE_URL", "postgres://localhost/menu");
    assert!(ServerConfig::from_env().is_err());
    clear_env();
}
