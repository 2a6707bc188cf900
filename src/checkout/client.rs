//! HTTP client for the backend's order endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::{CheckoutError, OrderRequest};
use crate::catalog::client::error_message;

const PLACE_ORDER_PATH: &str = "/api/order";
const USER_ORDERS_PATH: &str = "/api/order/user-orders";

/// What the backend says after accepting an order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub order: Option<Value>,
}

/// A past order as listed by the backend. Only the fields shown to the
/// customer are typed; line items are passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default, alias = "amount")]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub products: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PlaceOrderEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    order: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct UserOrdersEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    orders: Vec<OrderSummary>,
}

#[derive(Clone)]
pub struct OrderClient {
    client: reqwest::Client,
    base_url: String,
}

impl OrderClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Submit `order` on behalf of the user holding `token`.
    pub async fn submit(
        &self,
        token: &str,
        order: &OrderRequest,
    ) -> Result<OrderReceipt, CheckoutError> {
        let url = format!("{}{PLACE_ORDER_PATH}", self.base_url);
        tracing::debug!(%url, lines = order.products.len(), "submitting order");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(order)
            .send()
            .await?;
        let envelope: PlaceOrderEnvelope = read_envelope(response).await?;

        if !envelope.success {
            return Err(CheckoutError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "order was not accepted".to_string()),
            ));
        }

        Ok(OrderReceipt {
            message: envelope.message,
            order: envelope.order,
        })
    }

    /// Orders placed by the user holding `token`.
    pub async fn user_orders(&self, token: &str) -> Result<Vec<OrderSummary>, CheckoutError> {
        let url = format!("{}{USER_ORDERS_PATH}", self.base_url);
        tracing::debug!(%url, "fetching user orders");

        let response = self
            .client
            .get(&url)
            .header("token", token)
            .send()
            .await?;
        let envelope: UserOrdersEnvelope = read_envelope(response).await?;

        if !envelope.success {
            return Err(CheckoutError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "could not load orders".to_string()),
            ));
        }
        Ok(envelope.orders)
    }
}

async fn read_envelope<T>(response: reqwest::Response) -> Result<T, CheckoutError>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CheckoutError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    response
        .json()
        .await
        .map_err(|e| CheckoutError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_summary_accepts_amount_alias() {
        let summary: OrderSummary = serde_json::from_str(
            r#"{"_id":"o1","status":"Order Placed","amount":120,"paymentMethod":"COD","date":1716634345448,"items":[]}"#,
        )
        .unwrap();
        assert_eq!(summary.id, "o1");
        assert_eq!(summary.total_amount, Some(Decimal::from(120)));
        assert_eq!(summary.payment_method.as_deref(), Some("COD"));
        assert!(summary.products.is_empty());
    }
}
