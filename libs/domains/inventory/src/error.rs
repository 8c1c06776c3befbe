use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("PLU generation exhausted after {0} attempts")]
    PluExhausted(usize),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Convert InventoryError to AppError for enveloped error responses
impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(msg) => AppError::NotFound(msg),
            InventoryError::Validation(msg) => AppError::BadRequest(msg),
            InventoryError::PluExhausted(attempts) => AppError::InternalServerError(format!(
                "Could not allocate a unique PLU after {} attempts",
                attempts
            )),
            InventoryError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
