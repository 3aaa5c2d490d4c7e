// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Builds the typed ServerConfig from environment variables with validated defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::{defaults, env_config};
use crate::errors::{AppError, AppResult};

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development, permissive defaults
    #[default]
    Development,
    /// Production, secrets required
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL (`sqlite:path` or `sqlite::memory:`)
    pub url: String,
}

/// Bearer token verification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 shared secret
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    /// Lifetime of tokens minted by tooling
    pub token_expiry_hours: i64,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Allowed CORS origins, `*` for any
    pub cors_origins: Vec<String>,
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// HTTP listener
    pub http: HttpConfig,
    /// Persistence
    pub database: DatabaseConfig,
    /// Identity
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing in production
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let environment = Environment::from_str_or_default(&env_config::environment());

        let jwt_secret = match env_config::jwt_secret() {
            Some(secret) => secret,
            None if environment.is_production() => {
                return Err(AppError::config(
                    "JWT_SECRET must be set when ENVIRONMENT=production",
                ));
            }
            None => {
                warn!("JWT_SECRET not set, using development secret");
                defaults::DEV_JWT_SECRET.to_owned()
            }
        };

        let config = Self {
            environment,
            http: HttpConfig {
                host: env_config::host(),
                port: env_config::http_port(),
                cors_origins: parse_origins(&env_config::cors_origins()),
            },
            database: DatabaseConfig {
                url: env_config::database_url(),
            },
            auth: AuthConfig {
                jwt_secret,
                token_expiry_hours: defaults::TOKEN_EXPIRY_HOURS,
            },
        };

        config.validate()?;
        info!("Configuration loaded: {}", config.summary());
        Ok(config)
    }

    /// Validate cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error when the database URL is not a `SQLite` URL
    pub fn validate(&self) -> AppResult<()> {
        if !self.database.url.starts_with("sqlite:") {
            return Err(AppError::config(format!(
                "Unsupported DATABASE_URL '{}': only sqlite URLs are supported",
                self.database.url
            )));
        }
        if self.http.port == 0 {
            return Err(AppError::config("HTTP_PORT must be non-zero"));
        }
        Ok(())
    }

    /// One-line summary safe for logs (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={} http={}:{} database={} cors={}",
            self.environment,
            self.http.host,
            self.http.port,
            self.database.url,
            self.http.cors_origins.join(",")
        )
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ServerConfig {
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
                jwt_secret: "secret".to_owned(),
                token_expiry_hours: 1,
            },
        }
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, https://app.example.com,"),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("PROD"),
            Environment::Production
        );
        assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
        assert_eq!(
            Environment::from_str_or_default("whatever"),
            Environment::Development
        );
    }

    #[test]
    fn test_validate_rejects_non_sqlite() {
        let mut config = sample_config();
        assert!(config.validate().is_ok());

        config.database.url = "postgres://localhost/menu".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_summary_hides_secret() {
        let config = sample_config();
        assert!(!config.summary().contains("secret"));
    }
}
