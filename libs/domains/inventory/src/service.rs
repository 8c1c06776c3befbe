//! Inventory Service - the stock ledger
//!
//! Owns the business rules for product/store/stock creation, quantity
//! adjustments (including the exhaustion-triggered product deletion, which
//! the repository applies transactionally), and filtered reads. Every
//! operation emits one action record to the history sink after the
//! persistence work has committed; emission is fire-and-forget and can
//! never fail an operation.

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{InventoryError, InventoryResult};
use crate::history::{Action, ActionHistory, ActionRecord};
use crate::models::{
    CreateProduct, CreateStock, CreateStore, Product, ProductFilter, Stock, StockAction,
    StockFilter, StockRow, Store,
};
use crate::plu;
use crate::repository::InventoryRepository;

pub struct InventoryService<R: InventoryRepository> {
    repository: Arc<R>,
    history: Arc<dyn ActionHistory>,
}

impl<R: InventoryRepository> InventoryService<R> {
    pub fn new(repository: R, history: Arc<dyn ActionHistory>) -> Self {
        Self {
            repository: Arc::new(repository),
            history,
        }
    }

    /// Create a new product under a freshly generated PLU
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> InventoryResult<Product> {
        input
            .validate()
            .map_err(|e| InventoryError::Validation(e.to_string()))?;

        let plu = plu::generate(self.repository.as_ref()).await?;
        let product = self.repository.insert_product(&plu, &input.name).await?;

        self.history.record(ActionRecord::new(
            None,
            Some(product.plu.clone()),
            Action::CreateProduct,
            format!("Product \"{}\" created.", product.name),
        ));

        Ok(product)
    }

    /// Create a new store
    #[instrument(skip(self, input), fields(store_name = %input.name))]
    pub async fn create_store(&self, input: CreateStore) -> InventoryResult<Store> {
        input
            .validate()
            .map_err(|e| InventoryError::Validation(e.to_string()))?;

        let store = self.repository.insert_store(&input.name).await?;

        self.history.record(ActionRecord::new(
            Some(store.id),
            None,
            Action::CreateStore,
            format!("Store \"{}\" created.", store.name),
        ));

        Ok(store)
    }

    /// Create a stock row for a product at a store.
    ///
    /// Fails with `NotFound` when the product does not exist (its PLU is
    /// needed for the history record).
    #[instrument(skip(self))]
    pub async fn create_stock(&self, input: CreateStock) -> InventoryResult<Stock> {
        let stock = self.repository.insert_stock(input).await?;
        let plu = self.plu_for_product(stock.product_id).await?;

        self.history.record(ActionRecord::new(
            Some(stock.store_id),
            Some(plu),
            Action::CreateStock,
            format!(
                "Stock created for product ID {} in store ID {}.",
                stock.product_id, stock.store_id
            ),
        ));

        Ok(stock)
    }

    /// Add `quantity` to a stock row's shelf quantity
    #[instrument(skip(self))]
    pub async fn increase_stock(&self, stock_id: i32, quantity: i32) -> InventoryResult<Stock> {
        let stock = self
            .repository
            .increase_shelf_quantity(stock_id, quantity)
            .await?
            .ok_or_else(|| {
                InventoryError::NotFound(format!("Stock with ID {} not found.", stock_id))
            })?;

        let plu = self.plu_for_product(stock.product_id).await?;

        self.history.record(ActionRecord::new(
            Some(stock.store_id),
            Some(plu),
            Action::IncreaseStock,
            format!("Increased stock by {} for stock ID {}.", quantity, stock_id),
        ));

        Ok(stock)
    }

    /// Apply a decrease to a stock row.
    ///
    /// `remove` subtracts from the shelf; `order` moves the quantity from
    /// the shelf into the order backlog. The repository runs the update
    /// and, when both counters land on exactly zero, the product deletion
    /// in a single transaction. History records are emitted after the
    /// commit: one `decrease_stock`, plus exactly one `delete_product`
    /// when the exhaustion rule fired.
    #[instrument(skip(self))]
    pub async fn decrease_stock(
        &self,
        stock_id: i32,
        quantity: i32,
        action: StockAction,
    ) -> InventoryResult<Stock> {
        let outcome = self
            .repository
            .decrease_stock(stock_id, quantity, action)
            .await?
            .ok_or_else(|| {
                InventoryError::NotFound(format!("Stock with ID {} not found.", stock_id))
            })?;

        self.history.record(ActionRecord::new(
            Some(outcome.stock.store_id),
            Some(outcome.plu.clone()),
            Action::DecreaseStock,
            format!(
                "Decreased stock by {} for stock ID {} with action \"{}\".",
                quantity, stock_id, action
            ),
        ));

        if outcome.product_deleted {
            self.history.record(ActionRecord::new(
                Some(outcome.stock.store_id),
                Some(outcome.plu.clone()),
                Action::DeleteProduct,
                format!(
                    "Product ID {} deleted as shelf & order quantities are zero.",
                    outcome.stock.product_id
                ),
            ));
        }

        Ok(outcome.stock)
    }

    /// List stocks joined with their products, narrowed by the filter
    #[instrument(skip(self))]
    pub async fn get_stocks_by_filters(
        &self,
        filter: StockFilter,
    ) -> InventoryResult<Vec<StockRow>> {
        let store_id = filter.store_id;
        let plu = filter.plu.clone();
        let description = if filter.is_constrained() {
            format!(
                "Fetched stocks by filters: {}",
                serde_json::to_string(&filter).unwrap_or_default()
            )
        } else {
            "Fetched all stocks.".to_string()
        };

        let stocks = self.repository.find_stocks(filter).await?;

        self.history.record(ActionRecord::new(
            store_id,
            plu,
            Action::GetStocksByFilters,
            description,
        ));

        Ok(stocks)
    }

    /// List products narrowed by the filter
    #[instrument(skip(self))]
    pub async fn get_products_by_filters(
        &self,
        filter: ProductFilter,
    ) -> InventoryResult<Vec<Product>> {
        let plu = filter.plu.clone();
        let description = if filter.is_constrained() {
            format!(
                "Fetched products by filters: {}",
                serde_json::to_string(&filter).unwrap_or_default()
            )
        } else {
            "Fetched all products.".to_string()
        };

        let products = self.repository.find_products(filter).await?;

        self.history.record(ActionRecord::new(
            None,
            plu,
            Action::GetProductsByFilters,
            description,
        ));

        Ok(products)
    }

    /// Resolve a product's PLU, failing with `NotFound` when the product
    /// is gone
    async fn plu_for_product(&self, product_id: i32) -> InventoryResult<String> {
        self.repository
            .plu_by_product_id(product_id)
            .await?
            .ok_or_else(|| {
                InventoryError::NotFound(format!("PLU not found for product ID {}", product_id))
            })
    }
}

impl<R: InventoryRepository> Clone for InventoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            history: Arc::clone(&self.history),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::RecordingHistory;
    use crate::models::Stock;
    use crate::repository::{DecreaseOutcome, MockInventoryRepository};

    fn service_with(
        repo: MockInventoryRepository,
    ) -> (InventoryService<MockInventoryRepository>, Arc<RecordingHistory>) {
        let history = Arc::new(RecordingHistory::new());
        (InventoryService::new(repo, history.clone()), history)
    }

    #[tokio::test]
    async fn test_create_product_generates_plu_and_records_action() {
        let mut mock_repo = MockInventoryRepository::new();
        mock_repo.expect_plu_exists().returning(|_| Ok(false));
        mock_repo
            .expect_insert_product()
            .returning(|plu, name| {
                Ok(Product {
                    id: 1,
                    plu: plu.to_string(),
                    name: name.to_string(),
                })
            });

        let (service, history) = service_with(mock_repo);

        let product = service
            .create_product(CreateProduct {
                name: "Widget".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(product.name, "Widget");
        assert_eq!(product.plu.len(), 11);

        let records = history.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, Action::CreateProduct);
        assert_eq!(records[0].plu.as_deref(), Some(product.plu.as_str()));
        assert_eq!(records[0].description, "Product \"Widget\" created.");
    }

    #[tokio::test]
    async fn test_create_product_rejects_empty_name() {
        let (service, history) = service_with(MockInventoryRepository::new());

        let result = service
            .create_product(CreateProduct {
                name: String::new(),
            })
            .await;

        assert!(matches!(result, Err(InventoryError::Validation(_))));
        assert!(history.records().is_empty());
    }

    #[tokio::test]
    async fn test_create_stock_fails_when_product_missing() {
        let mut mock_repo = MockInventoryRepository::new();
        mock_repo.expect_insert_stock().returning(|input| {
            Ok(Stock {
                id: 1,
                product_id: input.product_id,
                store_id: input.store_id,
                shelf_quantity: input.shelf_quantity,
                order_quantity: input.order_quantity,
            })
        });
        mock_repo
            .expect_plu_by_product_id()
            .returning(|_| Ok(None));

        let (service, history) = service_with(mock_repo);

        let result = service
            .create_stock(CreateStock {
                product_id: 42,
                store_id: 1,
                shelf_quantity: 0,
                order_quantity: 0,
            })
            .await;

        assert!(matches!(result, Err(InventoryError::NotFound(_))));
        assert!(history.records().is_empty());
    }

    #[tokio::test]
    async fn test_increase_stock_missing_row_is_not_found() {
        let mut mock_repo = MockInventoryRepository::new();
        mock_repo
            .expect_increase_shelf_quantity()
            .returning(|_, _| Ok(None));

        let (service, history) = service_with(mock_repo);

        let result = service.increase_stock(7, 5).await;

        assert!(matches!(result, Err(InventoryError::NotFound(_))));
        assert!(history.records().is_empty());
    }

    #[tokio::test]
    async fn test_decrease_records_single_delete_product_on_exhaustion() {
        let mut mock_repo = MockInventoryRepository::new();
        mock_repo
            .expect_decrease_stock()
            .returning(|stock_id, _, _| {
                Ok(Some(DecreaseOutcome {
                    stock: Stock {
                        id: stock_id,
                        product_id: 9,
                        store_id: 2,
                        shelf_quantity: 0,
                        order_quantity: 0,
                    },
                    plu: "A123456789B".to_string(),
                    product_deleted: true,
                }))
            });

        let (service, history) = service_with(mock_repo);

        let stock = service
            .decrease_stock(1, 5, StockAction::Remove)
            .await
            .unwrap();

        assert_eq!(stock.shelf_quantity, 0);

        let records = history.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].action, Action::DecreaseStock);
        assert_eq!(
            records[0].description,
            "Decreased stock by 5 for stock ID 1 with action \"remove\"."
        );
        assert_eq!(records[1].action, Action::DeleteProduct);
        assert_eq!(
            records[1].description,
            "Product ID 9 deleted as shelf & order quantities are zero."
        );
    }

    #[tokio::test]
    async fn test_decrease_without_exhaustion_records_only_decrease() {
        let mut mock_repo = MockInventoryRepository::new();
        mock_repo
            .expect_decrease_stock()
            .returning(|stock_id, _, _| {
                Ok(Some(DecreaseOutcome {
                    stock: Stock {
                        id: stock_id,
                        product_id: 9,
                        store_id: 2,
                        shelf_quantity: 3,
                        order_quantity: 2,
                    },
                    plu: "A123456789B".to_string(),
                    product_deleted: false,
                }))
            });

        let (service, history) = service_with(mock_repo);

        service
            .decrease_stock(1, 2, StockAction::Order)
            .await
            .unwrap();

        let records = history.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, Action::DecreaseStock);
        assert_eq!(
            records[0].description,
            "Decreased stock by 2 for stock ID 1 with action \"order\"."
        );
    }

    #[tokio::test]
    async fn test_get_stocks_description_distinguishes_filtered_reads() {
        let mut mock_repo = MockInventoryRepository::new();
        mock_repo.expect_find_stocks().returning(|_| Ok(vec![]));

        let (service, history) = service_with(mock_repo);

        service
            .get_stocks_by_filters(StockFilter::default())
            .await
            .unwrap();
        service
            .get_stocks_by_filters(StockFilter {
                store_id: Some(4),
                ..Default::default()
            })
            .await
            .unwrap();

        let records = history.records();
        assert_eq!(records[0].description, "Fetched all stocks.");
        assert!(records[1]
            .description
            .starts_with("Fetched stocks by filters:"));
        assert_eq!(records[1].store_id, Some(4));
    }
}
