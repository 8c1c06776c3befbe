use utoipa::OpenApi;

/// Aggregated OpenAPI document for the whole API surface
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockroom API",
        description = "Inventory stock management service"
    ),
    nest(
        (path = "/api", api = domain_inventory::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
