//! HTTP error mapping

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("El archivo debe ser una imagen.")]
    InvalidContentType,

    #[error("Field 'file' is required")]
    MissingFile,

    /// Body that could not be read as the expected form or JSON
    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    InferenceFailed(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    NotFound(String),

    /// Failed call to an external service. Details are logged, not returned.
    #[error("Internal Server Error")]
    Upstream(#[from] crate::Error),
}

impl ApiError {
    /// Malformed bodies answer 422 unless the size limit was hit
    fn rejected(status: StatusCode, body_text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(body_text)
        } else {
            ApiError::Unprocessable(body_text)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidContentType => StatusCode::BAD_REQUEST,
            ApiError::MissingFile | ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InferenceFailed(_) | ApiError::Internal(_) | ApiError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = match &self {
            ApiError::Upstream(err) => {
                tracing::error!("Upstream call failed: {}", err);
                self.to_string()
            }
            _ => self.to_string(),
        };

        (self.status(), Json(ErrorResponse { detail })).into_response()
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::rejected(err.status(), err.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::rejected(rejection.status(), rejection.body_text())
    }
}
