use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_helpers::{ApiResponse, ValidatedJson};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{InventoryError, InventoryResult};
use crate::models::{
    AdjustQuantity, CreateProduct, CreateStock, CreateStore, Product, ProductFilter, Stock,
    StockAction, StockFilter, StockRow, Store,
};
use crate::repository::InventoryRepository;
use crate::service::InventoryService;

/// OpenAPI documentation for the inventory API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_product,
        list_products,
        create_store,
        create_stock,
        list_stocks,
        increase_stock,
        decrease_stock,
    ),
    components(schemas(
        Product,
        Store,
        Stock,
        StockRow,
        CreateProduct,
        CreateStore,
        CreateStock,
        AdjustQuantity,
        StockAction,
    )),
    tags(
        (name = "inventory", description = "Inventory stock management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the inventory router with all HTTP endpoints
pub fn router<R: InventoryRepository + 'static>(service: InventoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route("/stores", post(create_store))
        .route("/stocks", post(create_stock).get(list_stocks))
        .route("/stocks/{id}/increase", put(increase_stock))
        .route("/stocks/{id}/decrease", put(decrease_stock))
        .with_state(shared_service)
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/products",
    tag = "inventory",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, description = "Invalid product name"),
        (status = 500, description = "Persistence failure")
    )
)]
async fn create_product<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> InventoryResult<impl IntoResponse> {
    let product = service.create_product(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Product created successfully.", product)),
    ))
}

/// List products with optional filters
#[utoipa::path(
    get,
    path = "/products",
    tag = "inventory",
    params(ProductFilter),
    responses(
        (status = 200, description = "Products fetched successfully", body = Vec<Product>),
        (status = 500, description = "Persistence failure")
    )
)]
async fn list_products<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    Query(filter): Query<ProductFilter>,
) -> InventoryResult<impl IntoResponse> {
    let products = service.get_products_by_filters(filter).await?;

    Ok(Json(ApiResponse::new(
        "Products fetched successfully.",
        products,
    )))
}

/// Create a new store
#[utoipa::path(
    post,
    path = "/stores",
    tag = "inventory",
    request_body = CreateStore,
    responses(
        (status = 201, description = "Store created successfully", body = Store),
        (status = 400, description = "Invalid store name"),
        (status = 500, description = "Persistence failure")
    )
)]
async fn create_store<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateStore>,
) -> InventoryResult<impl IntoResponse> {
    let store = service.create_store(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Store created successfully.", store)),
    ))
}

/// Create a stock row for a product at a store
#[utoipa::path(
    post,
    path = "/stocks",
    tag = "inventory",
    request_body = CreateStock,
    responses(
        (status = 201, description = "Stock created successfully", body = Stock),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Persistence failure")
    )
)]
async fn create_stock<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateStock>,
) -> InventoryResult<impl IntoResponse> {
    let stock = service.create_stock(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Stock created successfully.", stock)),
    ))
}

/// List stocks joined with product fields, with optional filters
#[utoipa::path(
    get,
    path = "/stocks",
    tag = "inventory",
    params(StockFilter),
    responses(
        (status = 200, description = "Stocks fetched successfully", body = Vec<StockRow>),
        (status = 500, description = "Persistence failure")
    )
)]
async fn list_stocks<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    Query(filter): Query<StockFilter>,
) -> InventoryResult<impl IntoResponse> {
    let stocks = service.get_stocks_by_filters(filter).await?;

    Ok(Json(ApiResponse::new(
        "Stocks fetched successfully.",
        stocks,
    )))
}

/// Increase a stock row's shelf quantity
#[utoipa::path(
    put,
    path = "/stocks/{id}/increase",
    tag = "inventory",
    params(("id" = i32, Path, description = "Stock ID")),
    request_body = AdjustQuantity,
    responses(
        (status = 200, description = "Stock increased successfully", body = Stock),
        (status = 400, description = "Quantity missing or not positive"),
        (status = 404, description = "Stock not found"),
        (status = 500, description = "Persistence failure")
    )
)]
async fn increase_stock<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<AdjustQuantity>,
) -> InventoryResult<impl IntoResponse> {
    let stock = service.increase_stock(id, input.quantity).await?;

    Ok(Json(ApiResponse::new(
        "Stock increased successfully.",
        stock,
    )))
}

#[derive(Debug, Deserialize)]
struct DecreaseParams {
    action: Option<String>,
}

/// Decrease a stock row's quantities.
///
/// `action=remove` takes units out of the system; `action=order` moves
/// them from the shelf into the order backlog.
#[utoipa::path(
    put,
    path = "/stocks/{id}/decrease",
    tag = "inventory",
    params(
        ("id" = i32, Path, description = "Stock ID"),
        ("action" = String, Query, description = "One of 'remove' or 'order'")
    ),
    request_body = AdjustQuantity,
    responses(
        (status = 200, description = "Stock decreased successfully", body = Stock),
        (status = 400, description = "Invalid action or quantity"),
        (status = 404, description = "Stock or product not found"),
        (status = 500, description = "Persistence failure")
    )
)]
async fn decrease_stock<R: InventoryRepository>(
    State(service): State<Arc<InventoryService<R>>>,
    Path(id): Path<i32>,
    Query(params): Query<DecreaseParams>,
    ValidatedJson(input): ValidatedJson<AdjustQuantity>,
) -> InventoryResult<impl IntoResponse> {
    let action = params
        .action
        .as_deref()
        .unwrap_or_default()
        .parse::<StockAction>()
        .map_err(|_| {
            InventoryError::Validation("Invalid action. Use 'remove' or 'order'.".to_string())
        })?;

    let stock = service.decrease_stock(id, input.quantity, action).await?;

    Ok(Json(ApiResponse::new(
        format!("Stock decreased successfully using action: {}.", action),
        stock,
    )))
}
