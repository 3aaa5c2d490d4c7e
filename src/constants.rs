// ABOUTME: System-wide constants and configuration defaults for the menu training API
// ABOUTME: Holds the core restaurant id, business id prefixes, pagination bounds and env readers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Application constants and environment-based configuration values.

/// Multi-tenancy constants
pub mod tenancy {
    /// Restaurant that owns the shared ingredient catalogue visible to every tenant
    pub const CORE_RESTAURANT_ID: &str = "RST-000001";

    /// Whether a restaurant id denotes the shared core catalogue
    #[must_use]
    pub fn is_core_restaurant(restaurant_id: &str) -> bool {
        restaurant_id == CORE_RESTAURANT_ID
    }
}

/// Prefixes of human readable business identifiers (`PREFIX-000001`)
pub mod id_prefixes {
    /// Ingredients
    pub const INGREDIENT: &str = "ING";
    /// Allergies
    pub const ALLERGY: &str = "ALG";
    /// Menu items
    pub const MENU_ITEM: &str = "MID";
    /// Recipes
    pub const RECIPE: &str = "RCP";
    /// Menus
    pub const MENU: &str = "MNU";
    /// Menu sections
    pub const MENU_SECTION: &str = "MSC";
    /// Equipment
    pub const EQUIPMENT: &str = "EQP";
    /// Restaurants
    pub const RESTAURANT: &str = "RST";

    /// Width of the zero padded numeric suffix
    pub const SEQUENCE_WIDTH: usize = 6;
}

/// List endpoint paging defaults
pub mod pagination {
    /// First page (1-based)
    pub const DEFAULT_PAGE: u32 = 1;
    /// Page size when the caller does not pass one
    pub const DEFAULT_LIMIT: u32 = 10;
    /// Upper bound on page size
    pub const MAX_LIMIT: u32 = 100;
}

/// Time-of-day format accepted for menu and section schedules
pub mod time_of_day {
    /// 24h `HH:MM`, single digit hours allowed
    pub const PATTERN: &str = r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$";
}

/// Service identity used in logs
pub mod service_names {
    /// Binary / service name
    pub const MENU_TRAINING_SERVER: &str = "menu-training-server";
    /// JWT audience expected on bearer tokens
    pub const API_AUDIENCE: &str = "menu-training-api";
}

/// Network defaults
pub mod ports {
    /// HTTP API port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// Fallback values used when environment variables are absent
pub mod defaults {
    /// Bind address
    pub const DEFAULT_HOST: &str = "127.0.0.1";
    /// On-disk SQLite database
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/menu_training.db";
    /// Development-only signing secret, rejected in production
    pub const DEV_JWT_SECRET: &str = "menu-training-development-secret-change-me";
    /// Token lifetime for tokens issued by tooling
    pub const TOKEN_EXPIRY_HOURS: i64 = 24;
}

/// Environment-based configuration
pub mod env_config {
    use std::env;

    use super::{defaults, ports};

    /// Get `HTTP` server port from environment or default
    #[must_use]
    pub fn http_port() -> u16 {
        env::var("HTTP_PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(ports::DEFAULT_HTTP_PORT)
    }

    /// Get bind host from environment or default
    #[must_use]
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| defaults::DEFAULT_HOST.into())
    }

    /// Get database `URL` from environment or default
    #[must_use]
    pub fn database_url() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| defaults::DEFAULT_DATABASE_URL.into())
    }

    /// Get the JWT signing secret if configured
    #[must_use]
    pub fn jwt_secret() -> Option<String> {
        env::var("JWT_SECRET").ok().filter(|s| !s.is_empty())
    }

    /// Get deployment environment name
    #[must_use]
    pub fn environment() -> String {
        env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
    }

    /// Get comma separated CORS origins
    #[must_use]
    pub fn cors_origins() -> String {
        env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into())
    }
}
