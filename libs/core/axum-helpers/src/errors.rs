//! Response envelope and application error type.
//!
//! Every response body, success or failure, is an [`ApiResponse`]:
//!
//! ```json
//! { "success": true, "message": "Product created successfully.", "data": { ... } }
//! ```
//!
//! Error responses carry `success: false` and no `data`; outside
//! production mode a `detail` field with the debug representation of the
//! underlying error is included.

use axum::{
    extract::rejection::JsonRejection,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use core_config::Environment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope with a payload
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            detail: None,
        }
    }
}

impl ApiResponse<()> {
    /// Successful envelope without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            detail: None,
        }
    }

    /// Failure envelope
    pub fn failure(message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            detail,
        }
    }
}

/// Application error type that converts to enveloped HTTP responses
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InternalServerError(String),

    #[error("{0}")]
    ServiceUnavailable(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let detail = if Environment::from_env().is_production() {
            None
        } else {
            Some(format!("{:?}", self))
        };

        let (status, message) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::info!("JSON extraction error: {}", e);
                (StatusCode::BAD_REQUEST, e.body_text())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::NotFound(msg) => {
                tracing::info!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg)
            }
            AppError::Conflict(msg) => {
                tracing::info!("Conflict: {}", msg);
                (StatusCode::CONFLICT, msg)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
        };

        (status, Json(ApiResponse::failure(message, detail))).into_response()
    }
}

/// Fallback handler for unmatched routes
pub async fn not_found(uri: Uri) -> Response {
    let body = Json(ApiResponse::failure(format!("Not Found - {}", uri), None));
    (StatusCode::NOT_FOUND, body).into_response()
}
