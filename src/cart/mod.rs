//! Shopping cart state: the in-memory mapping, its persisted encoding and the
//! store that keeps the two in step.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{CartLine, Product};

pub mod codec;
pub mod store;

pub use store::CartStore;

/// Key under which the cart blob lives in the durable store.
pub const CART_STORAGE_KEY: &str = "cartItems";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("missing product id")]
    MissingProductId,

    #[error("missing size selection")]
    MissingSize,
}

pub(crate) fn validate_line_key(product_id: &str, size: &str) -> Result<(), CartError> {
    if product_id.trim().is_empty() {
        return Err(CartError::MissingProductId);
    }
    if size.trim().is_empty() {
        return Err(CartError::MissingSize);
    }
    Ok(())
}

/// `product id -> size -> quantity`.
///
/// Every stored quantity is at least 1 and no product is kept with an empty
/// size map; the mutators below are the only way in and uphold both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: BTreeMap<String, BTreeMap<String, u32>>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity(&self, product_id: &str, size: &str) -> Option<u32> {
        self.items.get(product_id)?.get(size).copied()
    }

    pub fn sizes(&self, product_id: &str) -> Option<&BTreeMap<String, u32>> {
        self.items.get(product_id)
    }

    pub fn contains_product(&self, product_id: &str) -> bool {
        self.items.contains_key(product_id)
    }

    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Iterate `(product_id, size, quantity)` in product then size order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, u32)> {
        self.items.iter().flat_map(|(product_id, sizes)| {
            sizes
                .iter()
                .map(move |(size, quantity)| (product_id.as_str(), size.as_str(), *quantity))
        })
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.iter()
            .map(|(product_id, size, quantity)| CartLine {
                product_id: product_id.to_string(),
                size: size.to_string(),
                quantity,
            })
            .collect()
    }

    /// Bump `(product_id, size)` by one, creating it at 1. Returns the new quantity.
    pub fn increment(&mut self, product_id: &str, size: &str) -> u32 {
        let quantity = self
            .items
            .entry(product_id.to_string())
            .or_default()
            .entry(size.to_string())
            .or_insert(0);
        if *quantity == u32::MAX {
            tracing::warn!(product_id, size, "cart quantity saturated");
        }
        *quantity = quantity.saturating_add(1);
        *quantity
    }

    /// Set `(product_id, size)` to `quantity`; zero removes the pair and, with
    /// it, the product once its last size is gone.
    pub fn set(&mut self, product_id: &str, size: &str, quantity: u32) {
        if quantity > 0 {
            self.items
                .entry(product_id.to_string())
                .or_default()
                .insert(size.to_string(), quantity);
            return;
        }

        if let Some(sizes) = self.items.get_mut(product_id) {
            sizes.remove(size);
            if sizes.is_empty() {
                self.items.remove(product_id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total number of units across every line.
    pub fn count(&self) -> u64 {
        let mut total: u64 = 0;
        for (product_id, size, quantity) in self.iter() {
            match total.checked_add(u64::from(quantity)) {
                Some(next) => total = next,
                None => {
                    tracing::warn!(product_id, size, quantity, "cart count overflow, line skipped");
                }
            }
        }
        total
    }

    /// Sum of `price * quantity` over every line `lookup` can resolve.
    ///
    /// Unresolved lines contribute nothing. A line whose arithmetic overflows
    /// is skipped on its own so the rest of the total stays correct.
    pub fn amount<'a, F>(&self, lookup: F) -> Decimal
    where
        F: Fn(&str) -> Option<&'a Product>,
    {
        let mut total = Decimal::ZERO;
        for (product_id, size, quantity) in self.iter() {
            let Some(product) = lookup(product_id) else {
                tracing::debug!(product_id, size, "product not in catalog, line priced at zero");
                continue;
            };
            let line_total = product
                .price
                .checked_mul(Decimal::from(quantity))
                .and_then(|line| total.checked_add(line));
            match line_total {
                Some(next) => total = next,
                None => {
                    tracing::warn!(
                        product_id,
                        size,
                        quantity,
                        price = %product.price,
                        "cart amount overflow, line skipped"
                    );
                }
            }
        }
        total
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    pub(crate) fn product(id: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            description: String::new(),
            price: Decimal::from(price),
            images: vec![format!("https://img.example/{id}.png")],
            sizes: vec!["S".into(), "M".into(), "L".into()],
            category: "Men".into(),
            sub_category: "Topwear".into(),
            created_at: Utc.timestamp_millis_opt(1_716_634_345_448).unwrap(),
            bestseller: false,
        }
    }

    #[test]
    fn increment_counts_every_call() {
        let mut cart = Cart::new();
        for expected in 1..=4 {
            assert_eq!(cart.increment("p1", "M"), expected);
        }
        assert_eq!(cart.count(), 4);
        assert_eq!(cart.quantity("p1", "M"), Some(4));
    }

    #[test]
    fn setting_zero_removes_size_then_product() {
        let mut cart = Cart::new();
        cart.set("p1", "M", 2);
        cart.set("p1", "L", 1);

        cart.set("p1", "M", 0);
        assert_eq!(cart.quantity("p1", "M"), None);
        assert!(cart.contains_product("p1"));

        cart.set("p1", "L", 0);
        assert!(!cart.contains_product("p1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn setting_zero_on_missing_line_is_noop() {
        let mut cart = Cart::new();
        cart.set("p1", "M", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn increment_saturates() {
        let mut cart = Cart::new();
        cart.set("p1", "M", u32::MAX);
        assert_eq!(cart.increment("p1", "M"), u32::MAX);
    }

    #[test]
    fn lines_are_ordered() {
        let mut cart = Cart::new();
        cart.set("p2", "S", 1);
        cart.set("p1", "M", 2);
        cart.set("p1", "L", 3);

        let lines: Vec<_> = cart
            .lines()
            .into_iter()
            .map(|l| (l.product_id, l.size, l.quantity))
            .collect();
        assert_eq!(
            lines,
            vec![
                ("p1".to_string(), "L".to_string(), 3),
                ("p1".to_string(), "M".to_string(), 2),
                ("p2".to_string(), "S".to_string(), 1),
            ]
        );
    }

    #[test]
    fn amount_sums_resolved_lines() {
        let catalog: HashMap<String, Product> = [product("p1", 100), product("p2", 25)]
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();
        let mut cart = Cart::new();
        cart.set("p1", "M", 2);
        cart.set("p2", "S", 3);
        cart.set("missing", "S", 7);

        assert_eq!(cart.amount(|id| catalog.get(id)), Decimal::from(275));
        assert_eq!(cart.amount(|_| None), Decimal::ZERO);
    }

    #[test]
    fn amount_skips_overflowing_line_only() {
        let mut huge = product("huge", 0);
        huge.price = Decimal::MAX;
        let small = product("small", 5);
        let mut cart = Cart::new();
        cart.set("huge", "M", 2);
        cart.set("small", "M", 2);

        let amount = cart.amount(|id| match id {
            "huge" => Some(&huge),
            "small" => Some(&small),
            _ => None,
        });
        assert_eq!(amount, Decimal::from(10));
    }

    #[test]
    fn line_key_validation() {
        assert_eq!(validate_line_key("", "M"), Err(CartError::MissingProductId));
        assert_eq!(validate_line_key("p1", "  "), Err(CartError::MissingSize));
        assert!(validate_line_key("p1", "M").is_ok());
    }
}
