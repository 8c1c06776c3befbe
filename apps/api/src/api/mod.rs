use axum::{routing::get, Json, Router};
use serde_json::json;

pub mod health;
pub mod inventory;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by the `create_router` helper.
///
/// Takes a reference to AppState and initializes all domain services;
/// the returned router has state already applied.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().merge(inventory::router(state))
}

/// Index route, outside the `/api` prefix
pub fn index_router() -> Router {
    Router::new().route(
        "/",
        get(|| async { Json(json!({ "message": "Inventory Stock Management" })) }),
    )
}

/// Creates a router with the /ready endpoint that performs a real
/// database health check.
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
