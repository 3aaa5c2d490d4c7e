// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven ServerConfig used by the binary and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! All settings come from environment variables; there are no config files.

/// Environment and server configuration
pub mod environment;

pub use environment::{AuthConfig, DatabaseConfig, Environment, HttpConfig, ServerConfig};
