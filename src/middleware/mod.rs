// ABOUTME: HTTP middleware for request tracing, bearer authentication, admin checks and CORS
// ABOUTME: Provides the header-level concerns shared by every route module

/// Admin-only guard
pub mod admin_guard;
/// Bearer token authentication
pub mod auth;
/// CORS layer configuration
pub mod cors;
/// Request span construction
pub mod tracing;

pub use admin_guard::require_admin;
pub use auth::authenticate;
pub use cors::setup_cors;
pub use tracing::{create_request_span, REQUEST_ID_HEADER};
