// ABOUTME: Request tracing helpers for correlation and structured logging
// ABOUTME: Builds the per-request span used by TraceLayer, keyed by the x-request-id header
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::http::Request;
use tracing::Span;

/// Header carrying the request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id of a request, if `SetRequestIdLayer` or the client set one
#[must_use]
pub fn request_id<B>(request: &Request<B>) -> Option<&str> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
}

/// Create a tracing span for an HTTP request
///
/// `user_id` and `status_code` start empty and are recorded once known.
pub fn create_request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = request_id(request).unwrap_or("-"),
        user_id = tracing::field::Empty,
        status_code = tracing::field::Empty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_request_id_read_from_header() {
        let request = Request::builder()
            .uri("/api/menus")
            .header(REQUEST_ID_HEADER, "req-42")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id(&request), Some("req-42"));

        let bare = Request::builder().uri("/health").body(Body::empty()).unwrap();
        assert_eq!(request_id(&bare), None);
    }
}
