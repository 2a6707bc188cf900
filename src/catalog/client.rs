//! HTTP client for the backend's product list endpoint.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::Catalog;
use crate::models::Product;

const PRODUCT_LIST_PATH: &str = "/api/product/list";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog server error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("catalog request rejected: {0}")]
    Rejected(String),

    #[error("invalid catalog payload: {0}")]
    InvalidPayload(String),
}

/// `{ success, products, message }` as returned by the backend.
#[derive(Debug, Deserialize)]
struct ProductListEnvelope {
    success: bool,
    #[serde(default)]
    products: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and index the full product list.
    pub async fn fetch(&self) -> Result<Catalog, CatalogError> {
        let url = format!("{}{PRODUCT_LIST_PATH}", self.base_url);
        tracing::debug!(%url, "fetching catalog");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let envelope: ProductListEnvelope = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidPayload(e.to_string()))?;

        if !envelope.success {
            return Err(CatalogError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "could not load products".to_string()),
            ));
        }

        let entries = match envelope.products {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(CatalogError::InvalidPayload(
                    "products is not an array".to_string(),
                ));
            }
        };

        Ok(Catalog::from_products(decode_products(entries)))
    }
}

/// Decode each product on its own; an entry that does not parse is skipped.
fn decode_products(entries: Vec<Value>) -> Vec<Product> {
    let mut products = Vec::with_capacity(entries.len());
    for entry in entries {
        let product_id = entry
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or("-")
            .to_string();
        match serde_json::from_value::<Product>(entry) {
            Ok(product) => products.push(product),
            Err(err) => {
                tracing::warn!(%product_id, error = %err, "skipping unreadable catalog product");
            }
        }
    }
    products
}

/// Pull `message` out of a JSON error body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            if body.is_empty() {
                "unknown error".to_string()
            } else {
                body.to_string()
            }
        })
}
