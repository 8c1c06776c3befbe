//! # Axum Helpers
//!
//! Utilities and helpers shared by the workspace's Axum applications.
//!
//! ## Modules
//!
//! - **[`errors`]**: the `{success, message, data}` response envelope and
//!   the application error type behind every error response
//! - **[`extractors`]**: custom extractors (validated JSON)
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown

pub mod errors;
pub mod extractors;
pub mod server;

pub use errors::{ApiResponse, AppError, AppResult};
pub use extractors::ValidatedJson;
pub use server::{
    create_app, create_router, health_router, run_health_checks, shutdown_signal,
    HealthCheckFuture, HealthResponse,
};
