use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};

use crate::{
    entity::{product, stock, store},
    error::{InventoryError, InventoryResult},
    models::{CreateStock, Product, ProductFilter, Stock, StockAction, StockFilter, StockRow, Store},
    repository::{DecreaseOutcome, InventoryRepository},
};

/// PostgreSQL implementation of `InventoryRepository` over SeaORM.
///
/// Quantity updates are single `UPDATE ... RETURNING` statements, so
/// concurrent adjustments to the same row serialize inside PostgreSQL;
/// the decrease path wraps its update-then-maybe-delete sequence in an
/// explicit transaction.
pub struct PgInventoryRepository {
    db: DatabaseConnection,
}

impl PgInventoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InventoryRepository for PgInventoryRepository {
    async fn insert_product(&self, plu: &str, name: &str) -> InventoryResult<Product> {
        let model = product::ActiveModel {
            id: NotSet,
            plu: Set(plu.to_string()),
            name: Set(name.to_string()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn insert_store(&self, name: &str) -> InventoryResult<Store> {
        let model = store::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(store_id = model.id, "Created store");
        Ok(model.into())
    }

    async fn insert_stock(&self, input: CreateStock) -> InventoryResult<Stock> {
        let model = stock::ActiveModel {
            id: NotSet,
            product_id: Set(input.product_id),
            store_id: Set(input.store_id),
            shelf_quantity: Set(input.shelf_quantity),
            order_quantity: Set(input.order_quantity),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(stock_id = model.id, "Created stock");
        Ok(model.into())
    }

    async fn plu_exists(&self, plu: &str) -> InventoryResult<bool> {
        let exists = product::Entity::find()
            .filter(product::Column::Plu.eq(plu))
            .one(&self.db)
            .await?
            .is_some();

        Ok(exists)
    }

    async fn plu_by_product_id(&self, product_id: i32) -> InventoryResult<Option<String>> {
        let model = product::Entity::find_by_id(product_id).one(&self.db).await?;
        Ok(model.map(|m| m.plu))
    }

    async fn increase_shelf_quantity(
        &self,
        stock_id: i32,
        quantity: i32,
    ) -> InventoryResult<Option<Stock>> {
        let mut rows = stock::Entity::update_many()
            .col_expr(
                stock::Column::ShelfQuantity,
                Expr::col(stock::Column::ShelfQuantity).add(quantity),
            )
            .filter(stock::Column::Id.eq(stock_id))
            .exec_with_returning(&self.db)
            .await?;

        Ok(rows.pop().map(Stock::from))
    }

    async fn decrease_stock(
        &self,
        stock_id: i32,
        quantity: i32,
        action: StockAction,
    ) -> InventoryResult<Option<DecreaseOutcome>> {
        let txn = self.db.begin().await?;

        let mut update = stock::Entity::update_many().col_expr(
            stock::Column::ShelfQuantity,
            Expr::col(stock::Column::ShelfQuantity).sub(quantity),
        );
        if action == StockAction::Order {
            update = update.col_expr(
                stock::Column::OrderQuantity,
                Expr::col(stock::Column::OrderQuantity).add(quantity),
            );
        }

        let mut rows = update
            .filter(stock::Column::Id.eq(stock_id))
            .exec_with_returning(&txn)
            .await?;

        let Some(updated) = rows.pop() else {
            txn.rollback().await?;
            return Ok(None);
        };

        let Some(plu) = product::Entity::find_by_id(updated.product_id)
            .one(&txn)
            .await?
            .map(|p| p.plu)
        else {
            txn.rollback().await?;
            return Err(InventoryError::NotFound(format!(
                "PLU not found for product ID {}",
                updated.product_id
            )));
        };

        // Exhaustion rule: exact zero on both counters removes the
        // product; the stock row stays behind.
        let product_deleted = updated.shelf_quantity == 0 && updated.order_quantity == 0;
        if product_deleted {
            product::Entity::delete_by_id(updated.product_id)
                .exec(&txn)
                .await?;
            tracing::info!(
                product_id = updated.product_id,
                "Deleted product, shelf & order quantities are zero"
            );
        }

        txn.commit().await?;

        Ok(Some(DecreaseOutcome {
            stock: updated.into(),
            plu,
            product_deleted,
        }))
    }

    async fn find_stocks(&self, filter: StockFilter) -> InventoryResult<Vec<StockRow>> {
        let mut query = stock::Entity::find().find_also_related(product::Entity);

        if let Some(plu) = filter.plu {
            query = query.filter(product::Column::Plu.eq(plu));
        }
        if let Some(store_id) = filter.store_id {
            query = query.filter(stock::Column::StoreId.eq(store_id));
        }
        if let Some(min) = filter.shelf_quantity_min {
            query = query.filter(stock::Column::ShelfQuantity.gte(min));
        }
        if let Some(max) = filter.shelf_quantity_max {
            query = query.filter(stock::Column::ShelfQuantity.lte(max));
        }
        if let Some(min) = filter.order_quantity_min {
            query = query.filter(stock::Column::OrderQuantity.gte(min));
        }
        if let Some(max) = filter.order_quantity_max {
            query = query.filter(stock::Column::OrderQuantity.lte(max));
        }

        let rows = query.all(&self.db).await?;

        // Keep only rows whose product still exists: dangling stocks
        // left behind by the exhaustion rule drop out of the join.
        Ok(rows
            .into_iter()
            .filter_map(|(s, p)| {
                p.map(|p| StockRow {
                    id: s.id,
                    product_id: s.product_id,
                    store_id: s.store_id,
                    shelf_quantity: s.shelf_quantity,
                    order_quantity: s.order_quantity,
                    plu: p.plu,
                    name: p.name,
                })
            })
            .collect())
    }

    async fn find_products(&self, filter: ProductFilter) -> InventoryResult<Vec<Product>> {
        let mut query = product::Entity::find();

        if let Some(name) = filter.name {
            query = query.filter(
                Expr::col((product::Entity, product::Column::Name)).ilike(format!("%{}%", name)),
            );
        }
        if let Some(plu) = filter.plu {
            query = query.filter(product::Column::Plu.eq(plu));
        }

        let models = query.all(&self.db).await?;
        Ok(models.into_iter().map(Product::from).collect())
    }
}
