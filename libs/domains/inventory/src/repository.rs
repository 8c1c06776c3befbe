use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{InventoryError, InventoryResult};
use crate::models::{
    CreateStock, Product, ProductFilter, Stock, StockAction, StockFilter, StockRow, Store,
};

/// Result of a decrease: the updated stock row, the product's PLU, and
/// whether the exhaustion rule deleted the product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecreaseOutcome {
    pub stock: Stock,
    pub plu: String,
    pub product_deleted: bool,
}

/// Repository trait for inventory persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Insert a new product with a pre-generated PLU
    async fn insert_product(&self, plu: &str, name: &str) -> InventoryResult<Product>;

    /// Insert a new store
    async fn insert_store(&self, name: &str) -> InventoryResult<Store>;

    /// Insert a new stock row
    async fn insert_stock(&self, input: CreateStock) -> InventoryResult<Stock>;

    /// Whether any product already uses the given PLU
    async fn plu_exists(&self, plu: &str) -> InventoryResult<bool>;

    /// Look up the PLU of a product by its id
    async fn plu_by_product_id(&self, product_id: i32) -> InventoryResult<Option<String>>;

    /// Atomically add `quantity` to a stock row's shelf quantity.
    ///
    /// Returns `None` when no row matches `stock_id`.
    async fn increase_shelf_quantity(
        &self,
        stock_id: i32,
        quantity: i32,
    ) -> InventoryResult<Option<Stock>>;

    /// Atomically apply a decrease in one transaction.
    ///
    /// `remove` subtracts from the shelf only; `order` additionally adds
    /// the quantity to the order backlog. When both counters land on
    /// exactly zero, the parent product is deleted in the same
    /// transaction (the stock row is kept). Returns `None` when no row
    /// matches `stock_id`; a missing product rolls back with `NotFound`.
    async fn decrease_stock(
        &self,
        stock_id: i32,
        quantity: i32,
        action: StockAction,
    ) -> InventoryResult<Option<DecreaseOutcome>>;

    /// List stocks joined with their products, narrowed by the filter
    async fn find_stocks(&self, filter: StockFilter) -> InventoryResult<Vec<StockRow>>;

    /// List products narrowed by the filter
    async fn find_products(&self, filter: ProductFilter) -> InventoryResult<Vec<Product>>;
}

#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<i32, Product>,
    stores: BTreeMap<i32, Store>,
    stocks: BTreeMap<i32, Stock>,
    next_product_id: i32,
    next_store_id: i32,
    next_stock_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

/// In-memory implementation of InventoryRepository (for development/testing)
///
/// The write lock makes each operation atomic, mirroring the transaction
/// the PostgreSQL implementation issues.
#[derive(Debug, Default, Clone)]
pub struct InMemoryInventoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn insert_product(&self, plu: &str, name: &str) -> InventoryResult<Product> {
        let mut tables = self.tables.write().await;

        if tables.products.values().any(|p| p.plu == plu) {
            return Err(InventoryError::Validation(format!(
                "PLU '{}' already exists",
                plu
            )));
        }

        let id = next_id(&mut tables.next_product_id);
        let product = Product {
            id,
            plu: plu.to_string(),
            name: name.to_string(),
        };
        tables.products.insert(id, product.clone());

        tracing::info!(product_id = id, "Created product");
        Ok(product)
    }

    async fn insert_store(&self, name: &str) -> InventoryResult<Store> {
        let mut tables = self.tables.write().await;

        let id = next_id(&mut tables.next_store_id);
        let store = Store {
            id,
            name: name.to_string(),
        };
        tables.stores.insert(id, store.clone());

        tracing::info!(store_id = id, "Created store");
        Ok(store)
    }

    async fn insert_stock(&self, input: CreateStock) -> InventoryResult<Stock> {
        let mut tables = self.tables.write().await;

        let id = next_id(&mut tables.next_stock_id);
        let stock = Stock {
            id,
            product_id: input.product_id,
            store_id: input.store_id,
            shelf_quantity: input.shelf_quantity,
            order_quantity: input.order_quantity,
        };
        tables.stocks.insert(id, stock.clone());

        tracing::info!(stock_id = id, "Created stock");
        Ok(stock)
    }

    async fn plu_exists(&self, plu: &str) -> InventoryResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.products.values().any(|p| p.plu == plu))
    }

    async fn plu_by_product_id(&self, product_id: i32) -> InventoryResult<Option<String>> {
        let tables = self.tables.read().await;
        Ok(tables.products.get(&product_id).map(|p| p.plu.clone()))
    }

    async fn increase_shelf_quantity(
        &self,
        stock_id: i32,
        quantity: i32,
    ) -> InventoryResult<Option<Stock>> {
        let mut tables = self.tables.write().await;

        let Some(stock) = tables.stocks.get_mut(&stock_id) else {
            return Ok(None);
        };
        stock.shelf_quantity += quantity;

        Ok(Some(stock.clone()))
    }

    async fn decrease_stock(
        &self,
        stock_id: i32,
        quantity: i32,
        action: StockAction,
    ) -> InventoryResult<Option<DecreaseOutcome>> {
        let mut tables = self.tables.write().await;

        let Some(mut stock) = tables.stocks.get(&stock_id).cloned() else {
            return Ok(None);
        };

        let Some(plu) = tables.products.get(&stock.product_id).map(|p| p.plu.clone()) else {
            return Err(InventoryError::NotFound(format!(
                "PLU not found for product ID {}",
                stock.product_id
            )));
        };

        stock.shelf_quantity -= quantity;
        if action == StockAction::Order {
            stock.order_quantity += quantity;
        }

        let product_deleted = stock.shelf_quantity == 0 && stock.order_quantity == 0;
        if product_deleted {
            tables.products.remove(&stock.product_id);
            tracing::info!(
                product_id = stock.product_id,
                "Deleted product, shelf & order quantities are zero"
            );
        }

        tables.stocks.insert(stock_id, stock.clone());

        Ok(Some(DecreaseOutcome {
            stock,
            plu,
            product_deleted,
        }))
    }

    async fn find_stocks(&self, filter: StockFilter) -> InventoryResult<Vec<StockRow>> {
        let tables = self.tables.read().await;

        let rows = tables
            .stocks
            .values()
            // inner join: stocks whose product is gone drop out
            .filter_map(|s| {
                tables.products.get(&s.product_id).map(|p| StockRow {
                    id: s.id,
                    product_id: s.product_id,
                    store_id: s.store_id,
                    shelf_quantity: s.shelf_quantity,
                    order_quantity: s.order_quantity,
                    plu: p.plu.clone(),
                    name: p.name.clone(),
                })
            })
            .filter(|row| {
                if let Some(ref plu) = filter.plu {
                    if &row.plu != plu {
                        return false;
                    }
                }
                if let Some(store_id) = filter.store_id {
                    if row.store_id != store_id {
                        return false;
                    }
                }
                if let Some(min) = filter.shelf_quantity_min {
                    if row.shelf_quantity < min {
                        return false;
                    }
                }
                if let Some(max) = filter.shelf_quantity_max {
                    if row.shelf_quantity > max {
                        return false;
                    }
                }
                if let Some(min) = filter.order_quantity_min {
                    if row.order_quantity < min {
                        return false;
                    }
                }
                if let Some(max) = filter.order_quantity_max {
                    if row.order_quantity > max {
                        return false;
                    }
                }
                true
            })
            .collect();

        Ok(rows)
    }

    async fn find_products(&self, filter: ProductFilter) -> InventoryResult<Vec<Product>> {
        let tables = self.tables.read().await;

        let products = tables
            .products
            .values()
            .filter(|p| {
                if let Some(ref name) = filter.name {
                    if !p.name.to_lowercase().contains(&name.to_lowercase()) {
                        return false;
                    }
                }
                if let Some(ref plu) = filter.plu {
                    if &p.plu != plu {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        Ok(products)
    }
}
