//! Error-to-response mapping for the web layer

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::errors::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::UnknownRegion { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Source(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, format!("ERROR: {self}")).into_response()
    }
}
