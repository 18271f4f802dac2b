//! HTTP error mapping
//!
//! Core errors carry the failure taxonomy; this module maps them onto
//! status codes and the `{"message": ...}` body every client expects.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use memories_core::CoreError;
use memories_types::ApiMessage;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CoreError::NotAuthenticated(_) => StatusCode::UNAUTHORIZED,
            CoreError::NotAuthorized => StatusCode::FORBIDDEN,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Validation(_) | CoreError::SelfFollow | CoreError::EmptyComment => {
                StatusCode::BAD_REQUEST
            }
            CoreError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
            CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if !self.0.is_client_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        let message = match &self.0 {
            // Do not leak storage details to clients
            CoreError::Storage(_) => "Server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(ApiMessage { message })).into_response()
    }
}
