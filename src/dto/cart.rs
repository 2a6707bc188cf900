use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::checkout::CartTotals;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub size: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub size: String,
    pub quantity: u32,
}

/// A cart line joined with whatever the catalog knows about its product.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItemDto {
    pub product_id: String,
    pub size: String,
    pub quantity: u32,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub line_total: Decimal,
    /// False when the product is missing from the catalog and a placeholder is shown.
    pub resolved: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartItemDto>,
    pub count: u64,
    pub totals: CartTotals,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartCount {
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartLineQuantity {
    pub product_id: String,
    pub size: String,
    pub quantity: u32,
}
