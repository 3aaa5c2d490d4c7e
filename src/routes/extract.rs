// ABOUTME: Request extractors that report body and query decoding failures as API errors
// ABOUTME: Wraps axum's Json and Query so rejections use the JSON error envelope with status 400
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// JSON body extractor rejecting with [`AppError`] instead of axum's plain-text 4xx
///
/// Missing fields, wrong types, syntax errors and a missing
/// `Content-Type: application/json` all become `INVALID_INPUT` (400).
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Query string extractor rejecting with [`AppError`]
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use serde::Deserialize;

    use super::*;
    use crate::errors::ErrorCode;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct NewAllergy {
        allergy_name: String,
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        page: Option<u32>,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_field_is_invalid_input() {
        let err = ValidatedJson::<NewAllergy>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.http_status(), 400);
        assert!(err.message.contains("allergyName"));
    }

    #[tokio::test]
    async fn test_well_formed_body_passes_through() {
        let request = json_request(r#"{"allergyName":"Soy"}"#);
        let ValidatedJson(body) = ValidatedJson::<NewAllergy>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(body.allergy_name, "Soy");
    }

    #[tokio::test]
    async fn test_bad_query_value_is_invalid_input() {
        let request = Request::builder()
            .uri("/?page=abc")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let err = ValidatedQuery::<Paging>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        let request = Request::builder()
            .uri("/?page=2")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let ValidatedQuery(paging) =
            ValidatedQuery::<Paging>::from_request_parts(&mut parts, &())
                .await
                .unwrap();
        assert_eq!(paging.page, Some(2));
    }
}
