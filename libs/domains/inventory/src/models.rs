use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Product entity - one sellable item, identified by a generated PLU code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier
    pub id: i32,
    /// Generated Price Look-Up code, unique across all products
    pub plu: String,
    /// Product name
    pub name: String,
}

/// Store entity - one physical location holding stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Store {
    /// Unique identifier
    pub id: i32,
    /// Store name
    pub name: String,
}

/// Stock entity - the quantity of one product at one store
///
/// Quantities are split into units physically on the shelf and units
/// reserved against customer orders. Neither counter is clamped: a
/// decrease larger than the available quantity goes negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Stock {
    /// Unique identifier
    pub id: i32,
    /// Product this stock belongs to
    pub product_id: i32,
    /// Store this stock is held at
    pub store_id: i32,
    /// Units physically on the shelf
    pub shelf_quantity: i32,
    /// Units reserved/backlogged against orders
    pub order_quantity: i32,
}

/// A stock row joined with its product's fields, as returned by stock queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StockRow {
    pub id: i32,
    pub product_id: i32,
    pub store_id: i32,
    pub shelf_quantity: i32,
    pub order_quantity: i32,
    /// PLU of the joined product
    pub plu: String,
    /// Name of the joined product
    pub name: String,
}

/// DTO for creating a new product; the PLU is generated server-side
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "Product name must not be empty."))]
    pub name: String,
}

/// DTO for creating a new store
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStore {
    #[validate(length(min = 1, message = "Store name must not be empty."))]
    pub name: String,
}

/// DTO for creating a stock row; omitted quantities default to zero
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStock {
    pub product_id: i32,
    pub store_id: i32,
    #[serde(default)]
    pub shelf_quantity: i32,
    #[serde(default)]
    pub order_quantity: i32,
}

/// DTO for increase/decrease requests
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AdjustQuantity {
    #[validate(range(min = 1, message = "Quantity must be a positive number."))]
    pub quantity: i32,
}

/// What a decrease means: `remove` takes units out of the system,
/// `order` moves them from the shelf into the order backlog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StockAction {
    Remove,
    Order,
}

/// Deserialize an optional string, treating the empty string as absent.
///
/// Query filters must not distinguish `?plu=` from an omitted parameter.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Query filters for listing stocks; absent filters impose no constraint
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct StockFilter {
    /// Exact PLU of the joined product
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<i32>,
    /// Inclusive lower bound on shelf quantity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelf_quantity_min: Option<i32>,
    /// Inclusive upper bound on shelf quantity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelf_quantity_max: Option<i32>,
    /// Inclusive lower bound on order quantity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_quantity_min: Option<i32>,
    /// Inclusive upper bound on order quantity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_quantity_max: Option<i32>,
}

impl StockFilter {
    /// Whether any filter is active
    pub fn is_constrained(&self) -> bool {
        self.plu.is_some()
            || self.store_id.is_some()
            || self.shelf_quantity_min.is_some()
            || self.shelf_quantity_max.is_some()
            || self.order_quantity_min.is_some()
            || self.order_quantity_max.is_some()
    }
}

/// Query filters for listing products; absent filters impose no constraint
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Exact PLU
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plu: Option<String>,
}

impl ProductFilter {
    /// Whether any filter is active
    pub fn is_constrained(&self) -> bool {
        self.name.is_some() || self.plu.is_some()
    }
}
