use axum::Router;
use domain_inventory::{handlers, HistoryClient, InventoryService, PgInventoryRepository};
use std::sync::Arc;

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgInventoryRepository::new(state.db.clone());
    let history = Arc::new(HistoryClient::new(&state.config.history));
    let service = InventoryService::new(repository, history);
    handlers::router(service)
}
