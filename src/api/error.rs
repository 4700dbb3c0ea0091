//! Mapping from pipeline failures to HTTP responses.
//!
//! Every error kind is matched explicitly in [`ApiError::status`]; adding a
//! variant anywhere below forces a decision here.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::models::ErrorResponse;
use crate::application::{InferenceError, PoolError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Prediction error: {0}")]
    Pool(#[from] PoolError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Inference(e) => match e {
                InferenceError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                InferenceError::ScalerUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                InferenceError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Pool(e) => match e {
                PoolError::Closed => StatusCode::SERVICE_UNAVAILABLE,
                PoolError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), "{self}");
        }
        (status, Json(ErrorResponse { detail: self.to_string() })).into_response()
    }
}
