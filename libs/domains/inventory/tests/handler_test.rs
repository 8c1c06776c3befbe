//! Handler tests for the inventory domain
//!
//! These tests drive the domain's HTTP handlers over the in-memory
//! repository: request deserialization, boundary validation, status codes,
//! the response envelope, and the history records the handlers trigger.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use domain_inventory::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()

fn test_app() -> (
    Router,
    InventoryService<InMemoryInventoryRepository>,
    Arc<RecordingHistory>,
) {
    let history = Arc::new(RecordingHistory::new());
    let service = InventoryService::new(InMemoryInventoryRepository::new(), history.clone());
    let app = handlers::router(service.clone());
    (app, service, history)
}

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_create_product_returns_201_with_generated_plu() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(json_request("POST", "/products", json!({"name": "Widget"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Product created successfully.");
    assert_eq!(body["data"]["name"], "Widget");

    let plu = body["data"]["plu"].as_str().unwrap();
    let pattern = regex::Regex::new(r"^[A-Z][0-9]{9}[A-Z]$").unwrap();
    assert!(pattern.is_match(plu), "unexpected PLU format: {plu}");
}

#[tokio::test]
async fn test_create_product_rejects_empty_name() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(json_request("POST", "/products", json!({"name": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_create_store_returns_201() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(json_request("POST", "/stores", json!({"name": "Downtown"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Store created successfully.");
    assert_eq!(body["data"]["name"], "Downtown");
}

#[tokio::test]
async fn test_create_stock_defaults_quantities_to_zero() {
    let (app, service, _) = test_app();

    service
        .create_product(CreateProduct {
            name: "Widget".to_string(),
        })
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/stocks",
            json!({"product_id": 1, "store_id": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["data"]["shelf_quantity"], 0);
    assert_eq!(body["data"]["order_quantity"], 0);
}

#[tokio::test]
async fn test_create_stock_for_missing_product_returns_404() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/stocks",
            json!({"product_id": 99, "store_id": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_increase_rejects_non_positive_quantity() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/stocks/1/increase",
            json!({"quantity": -5}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Quantity must be a positive number.");
}

#[tokio::test]
async fn test_increase_rejects_missing_quantity() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(json_request("PUT", "/stocks/1/increase", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_increase_adds_to_shelf_quantity_only() {
    let (app, service, _) = test_app();

    service
        .create_product(CreateProduct {
            name: "Widget".to_string(),
        })
        .await
        .unwrap();
    service
        .create_stock(CreateStock {
            product_id: 1,
            store_id: 1,
            shelf_quantity: 5,
            order_quantity: 2,
        })
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/stocks/1/increase",
            json!({"quantity": 3}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Stock increased successfully.");
    assert_eq!(body["data"]["shelf_quantity"], 8);
    assert_eq!(body["data"]["order_quantity"], 2);
}

#[tokio::test]
async fn test_increase_missing_stock_returns_404() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/stocks/42/increase",
            json!({"quantity": 3}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_decrease_rejects_invalid_action() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/stocks/1/decrease?action=bogus",
            json!({"quantity": 5}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Invalid action. Use 'remove' or 'order'.");
}

#[tokio::test]
async fn test_decrease_rejects_missing_action() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/stocks/1/decrease",
            json!({"quantity": 5}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Invalid action. Use 'remove' or 'order'.");
}

#[tokio::test]
async fn test_decrease_with_order_action_moves_units() {
    let (app, service, _) = test_app();

    service
        .create_product(CreateProduct {
            name: "Widget".to_string(),
        })
        .await
        .unwrap();
    service
        .create_stock(CreateStock {
            product_id: 1,
            store_id: 1,
            shelf_quantity: 5,
            order_quantity: 0,
        })
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/stocks/1/decrease?action=order",
            json!({"quantity": 2}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response.into_body()).await;
    assert_eq!(
        body["message"],
        "Stock decreased successfully using action: order."
    );
    assert_eq!(body["data"]["shelf_quantity"], 3);
    assert_eq!(body["data"]["order_quantity"], 2);
}

#[tokio::test]
async fn test_decrease_missing_stock_returns_404() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/stocks/42/decrease?action=remove",
            json!({"quantity": 5}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_products_filters_by_name_substring() {
    let (app, service, _) = test_app();

    for name in ["Blue Widget", "Red Widget", "Gadget"] {
        service
            .create_product(CreateProduct {
                name: name.to_string(),
            })
            .await
            .unwrap();
    }

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/products?name=widget")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Products fetched successfully.");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_stocks_filters_by_store_and_plu() {
    let (app, service, _) = test_app();

    let product = service
        .create_product(CreateProduct {
            name: "Widget".to_string(),
        })
        .await
        .unwrap();
    service
        .create_product(CreateProduct {
            name: "Gadget".to_string(),
        })
        .await
        .unwrap();

    for (product_id, store_id) in [(1, 1), (1, 2), (2, 1)] {
        service
            .create_stock(CreateStock {
                product_id,
                store_id,
                shelf_quantity: 10,
                order_quantity: 0,
            })
            .await
            .unwrap();
    }

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/stocks?plu={}&store_id=1", product.plu))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response.into_body()).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["plu"], product.plu.as_str());
    assert_eq!(rows[0]["store_id"], 1);
    assert_eq!(rows[0]["name"], "Widget");
}

#[tokio::test]
async fn test_history_failure_never_alters_the_response() {
    // History client pointed at a port nothing listens on: every record
    // is dropped with a warning, the operation must still succeed.
    let config = core_config::history::HistoryConfig::new("http://127.0.0.1:9/actions");
    let history = Arc::new(HistoryClient::new(&config));
    let service = InventoryService::new(InMemoryInventoryRepository::new(), history);
    let app = handlers::router(service);

    let response = app
        .oneshot(json_request("POST", "/products", json!({"name": "Widget"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], true);
}
