//! Turning a cart into an order request for the backend.
//!
//! Nothing here touches the cart itself; callers pass the line list in and
//! decide what to do with the cart once the backend accepts the order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::catalog::Catalog;
use crate::models::CartLine;

pub mod client;

pub use client::{OrderClient, OrderReceipt, OrderSummary};

pub const DEFAULT_PAYMENT_METHOD: &str = "Stripe";

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("cart is empty")]
    EmptyCart,

    #[error("product {0} is not in the catalog")]
    UnknownProduct(String),

    #[error("order total overflow")]
    AmountOverflow,

    #[error("order request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("order server error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("order rejected: {0}")]
    Rejected(String),

    #[error("invalid order payload: {0}")]
    InvalidPayload(String),
}

/// Delivery details collected on the checkout form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: String,
}

impl ShippingDetails {
    /// Reports every blank required field at once.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("country", &self.country),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::MissingFields(missing))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

impl CartTotals {
    /// Delivery is only charged once there is something to pay for.
    pub fn new(subtotal: Decimal, delivery_fee: Decimal) -> Self {
        let delivery_fee = if subtotal.is_zero() {
            Decimal::ZERO
        } else {
            delivery_fee
        };
        Self {
            subtotal,
            delivery_fee,
            total: subtotal.saturating_add(delivery_fee),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderProduct {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    pub size: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderAddress {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
}

impl From<&ShippingDetails> for OrderAddress {
    fn from(shipping: &ShippingDetails) -> Self {
        let postal_code = shipping.postal_code.clone().unwrap_or_default();
        Self {
            name: shipping.full_name.trim().to_string(),
            phone: shipping.phone.trim().to_string(),
            address: shipping.address.trim().to_string(),
            city: shipping.city.trim().to_string(),
            state: postal_code.clone(),
            country: shipping.country.trim().to_string(),
            pincode: postal_code,
        }
    }
}

/// Body of `POST /api/order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub products: Vec<OrderProduct>,
    pub address: OrderAddress,
    pub payment_method: String,
    pub total_amount: Decimal,
}

impl OrderRequest {
    /// Price every line from `catalog` and attach the shipping address.
    ///
    /// Unlike cart totals, a line the catalog cannot resolve fails the whole
    /// order: nothing is ever ordered at a placeholder price.
    pub fn build(
        lines: &[CartLine],
        catalog: &Catalog,
        shipping: &ShippingDetails,
        payment_method: &str,
        delivery_fee: Decimal,
    ) -> Result<Self, CheckoutError> {
        shipping.validate()?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut subtotal = Decimal::ZERO;
        let mut products = Vec::with_capacity(lines.len());
        for line in lines {
            let product = catalog
                .get(&line.product_id)
                .ok_or_else(|| CheckoutError::UnknownProduct(line.product_id.clone()))?;
            subtotal = product
                .price
                .checked_mul(Decimal::from(line.quantity))
                .and_then(|line_total| subtotal.checked_add(line_total))
                .ok_or(CheckoutError::AmountOverflow)?;
            products.push(OrderProduct {
                product_id: product.id.clone(),
                name: product.name.clone(),
                quantity: line.quantity,
                price: product.price,
                size: line.size.clone(),
                image: product.first_image().map(str::to_string),
            });
        }

        let totals = CartTotals::new(subtotal, delivery_fee);
        Ok(Self {
            products,
            address: OrderAddress::from(shipping),
            payment_method: payment_method.to_string(),
            total_amount: totals.total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::tests::product;

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            full_name: "Lan Nguyen".into(),
            email: "lan@example.com".into(),
            phone: "0900000000".into(),
            address: "12 Nguyen Hue".into(),
            city: "Ho Chi Minh City".into(),
            postal_code: Some("700000".into()),
            country: "Vietnam".into(),
        }
    }

    fn line(product_id: &str, size: &str, quantity: u32) -> CartLine {
        CartLine {
            product_id: product_id.into(),
            size: size.into(),
            quantity,
        }
    }

    #[test]
    fn validate_lists_every_missing_field() {
        let mut details = shipping();
        details.email = " ".into();
        details.country.clear();
        let Err(CheckoutError::MissingFields(missing)) = details.validate() else {
            panic!("expected missing fields");
        };
        assert_eq!(missing, vec!["email", "country"]);

        assert!(shipping().validate().is_ok());
    }

    #[test]
    fn postal_code_is_optional() {
        let mut details = shipping();
        details.postal_code = None;
        assert!(details.validate().is_ok());
        let address = OrderAddress::from(&details);
        assert_eq!(address.pincode, "");
        assert_eq!(address.state, "");
    }

    #[test]
    fn builds_priced_order() {
        let catalog = Catalog::from_products(vec![product("p1", 100), product("p2", 25)]);
        let lines = vec![line("p1", "M", 2), line("p2", "S", 1)];

        let order =
            OrderRequest::build(&lines, &catalog, &shipping(), "Stripe", Decimal::from(10))
                .unwrap();
        assert_eq!(order.products.len(), 2);
        assert_eq!(order.products[0].price, Decimal::from(100));
        assert_eq!(order.products[0].quantity, 2);
        assert_eq!(order.total_amount, Decimal::from(235));
        assert_eq!(order.address.pincode, "700000");
        assert_eq!(order.address.state, "700000");
    }

    #[test]
    fn serializes_backend_field_names() {
        let catalog = Catalog::from_products(vec![product("p1", 100)]);
        let order = OrderRequest::build(
            &[line("p1", "M", 1)],
            &catalog,
            &shipping(),
            DEFAULT_PAYMENT_METHOD,
            Decimal::from(10),
        )
        .unwrap();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["paymentMethod"], "Stripe");
        assert_eq!(json["totalAmount"], 110.0);
        assert_eq!(json["products"][0]["productId"], "p1");
        assert_eq!(json["address"]["name"], "Lan Nguyen");
    }

    #[test]
    fn unknown_product_fails_the_order() {
        let catalog = Catalog::from_products(vec![product("p1", 100)]);
        let lines = vec![line("p1", "M", 1), line("ghost", "M", 1)];
        let err = OrderRequest::build(&lines, &catalog, &shipping(), "Stripe", Decimal::ZERO)
            .unwrap_err();
        assert!(matches!(err, CheckoutError::UnknownProduct(id) if id == "ghost"));
    }

    #[test]
    fn empty_cart_is_rejected() {
        let catalog = Catalog::default();
        let err =
            OrderRequest::build(&[], &catalog, &shipping(), "Stripe", Decimal::ZERO).unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[test]
    fn delivery_fee_only_for_non_zero_subtotal() {
        let fee = Decimal::from(10);
        assert_eq!(CartTotals::new(Decimal::ZERO, fee).total, Decimal::ZERO);
        let totals = CartTotals::new(Decimal::from(50), fee);
        assert_eq!(totals.delivery_fee, fee);
        assert_eq!(totals.total, Decimal::from(60));
    }
}
