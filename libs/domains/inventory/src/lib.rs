//! Inventory Domain
//!
//! Stock management for products held at stores: product/store/stock
//! creation, atomic quantity adjustments, filtered queries, and
//! fire-and-forget action reporting to an external history service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, PLU generation, history records
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, filters
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_inventory::{
//!     handlers,
//!     history::RecordingHistory,
//!     repository::InMemoryInventoryRepository,
//!     service::InventoryService,
//! };
//!
//! let repository = InMemoryInventoryRepository::new();
//! let service = InventoryService::new(repository, Arc::new(RecordingHistory::new()));
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod history;
pub mod models;
pub mod plu;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{InventoryError, InventoryResult};
pub use history::{Action, ActionHistory, ActionRecord, HistoryClient, RecordingHistory};
pub use models::{
    AdjustQuantity, CreateProduct, CreateStock, CreateStore, Product, ProductFilter, StockAction,
    Stock, StockFilter, StockRow, Store,
};
pub use postgres::PgInventoryRepository;
pub use repository::{DecreaseOutcome, InMemoryInventoryRepository, InventoryRepository};
pub use service::InventoryService;
