//! SeaORM entities for the inventory tables.
//!
//! `stocks.product_id` intentionally carries no foreign key: the ledger
//! deletes an exhausted product while keeping its stock rows (they drop
//! out of queries through the product join instead).

pub mod product;
pub mod stock;
pub mod store;
