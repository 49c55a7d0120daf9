use axum::http::StatusCode;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use stacks_core::error::CoreError;
use thiserror::Error;

#[derive(Clone, Error, Debug, utoipa::ToResponse, utoipa::ToSchema)]
pub enum AppError {
    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    #[error("validation failed on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("authentication required")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    fn get_error_msg(&self) -> (axum::http::StatusCode, String) {
        let status: axum::http::StatusCode = match self {
            AppError::NotFound(_, _) => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string())
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NotFound(kind, id) => AppError::NotFound(kind, id),
            CoreError::Validation { field, message } => AppError::Validation {
                field: field.to_string(),
                message,
            },
            CoreError::Unauthorized => AppError::Unauthorized,
            CoreError::Forbidden(reason) => AppError::Forbidden(reason),
            CoreError::Conflict(reason) => AppError::Conflict(reason),
            CoreError::Internal(reason) => AppError::InternalServerError(reason),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        if let Some(app_error) = e.downcast_ref::<AppError>() {
            return app_error.clone();
        }
        AppError::InternalServerError(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.get_error_msg();
        let body = match &self {
            // Validation failures name the offending field.
            AppError::Validation { field, .. } => {
                serde_json::json!({ "error": true, "field": field, "message": message })
            }
            _ => serde_json::json!({ "error": true, "message": message }),
        };
        (status, Json(body)).into_response()
    }
}
