use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fridgechef_core::domain::common::entities::app_errors::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InternalServerError(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::NotFound(message) => ApiError::NotFound(message),
            CoreError::Invalid(message) => ApiError::BadRequest(message),
            other => {
                tracing::error!(error = %other, "Request failed");
                ApiError::InternalServerError(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ApiErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_by_kind() {
        assert_eq!(
            ApiError::from(CoreError::NotFound("gone".into())),
            ApiError::NotFound("gone".into())
        );
        assert_eq!(
            ApiError::from(CoreError::Invalid("bad id".into())),
            ApiError::BadRequest("bad id".into())
        );
        assert_eq!(
            ApiError::from(CoreError::Format("truncated".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(CoreError::Generation("timeout".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
