//! JSON body extractor
//!
//! Unlike `axum::Json`, this ignores the method and the `Content-Type`
//! header: lookups send their parameters as a JSON body on GET.

use crate::error::ApiError;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Decode(e.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http;
    use blog_types::GetUserRequest;

    async fn extract(body: &'static str) -> Result<GetUserRequest, ApiError> {
        let req = http::Request::builder()
            .method("GET")
            .uri("/users")
            .body(Body::from(body))
            .unwrap();
        JsonBody::<GetUserRequest>::from_request(req, &())
            .await
            .map(|JsonBody(inner)| inner)
    }

    #[tokio::test]
    async fn test_decodes_without_content_type() {
        let req = extract(r#"{"id": "u-1"}"#).await.unwrap();
        assert_eq!(req.id, "u-1");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let err = extract("{not json").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));

        let err = extract("").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(msg) if msg.contains("EOF")));
    }
}
