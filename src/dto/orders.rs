use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::checkout::{OrderReceipt, OrderRequest, OrderSummary, ShippingDetails};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub shipping: ShippingDetails,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutResponse {
    pub order: OrderRequest,
    pub receipt: OrderReceipt,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<OrderSummary>)]
    pub items: Vec<OrderSummary>,
}
