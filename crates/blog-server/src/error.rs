//! API error type with IntoResponse
//!
//! Messages are passed through to the caller unchanged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use blog_core::StoreError;
use blog_types::ValidationError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not valid JSON for the expected request (400)
    #[error("{0}")]
    Decode(String),

    /// A required field is empty (400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Any storage failure, including not-found on update/delete (500)
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Decode(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_error",
            Self::Validation(_) => "validation_error",
            Self::Store(e) => e.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::Entity;

    #[test]
    fn test_client_errors_are_400() {
        let err = ApiError::Decode("EOF while parsing a value".into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(ValidationError::MissingParameters { fields: vec!["id"] });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_is_server_error() {
        let err = ApiError::from(StoreError::not_found(Entity::User, "u-1"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "user does not exist for ID: u-1");
    }
}
