//! Persisted cart encoding.
//!
//! Current shape:
//!
//! ```json
//! { "p1": { "sizes": { "M": 2 }, "product": { "name": "Tee", "image": "…" } } }
//! ```
//!
//! Legacy shape, still found in older stores:
//!
//! ```json
//! { "p1": { "M": 2 } }
//! ```
//!
//! [`decode`] classifies a blob as one or the other before reading any
//! quantities; a legacy blob comes back as [`StoredCart::Legacy`] so the
//! caller can rewrite it in the current shape.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::Cart;
use crate::models::ProductSnapshot;

const SIZES_FIELD: &str = "sizes";
const PRODUCT_FIELD: &str = "product";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cart blob is not valid json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cart blob is malformed: {0}")]
    Malformed(String),
}

/// A decoded blob, tagged with the shape it was stored in.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredCart {
    Current {
        cart: Cart,
        snapshots: BTreeMap<String, ProductSnapshot>,
    },
    Legacy(Cart),
}

impl StoredCart {
    pub fn cart(&self) -> &Cart {
        match self {
            StoredCart::Current { cart, .. } => cart,
            StoredCart::Legacy(cart) => cart,
        }
    }
}

#[derive(Serialize)]
struct EntryRef<'a> {
    sizes: &'a BTreeMap<String, u32>,
    product: Option<&'a ProductSnapshot>,
}

/// Serialize `cart` in the current shape, attaching any known snapshots.
pub fn encode(
    cart: &Cart,
    snapshots: &BTreeMap<String, ProductSnapshot>,
) -> Result<String, serde_json::Error> {
    let entries: BTreeMap<&str, EntryRef<'_>> = cart
        .items
        .iter()
        .map(|(product_id, sizes)| {
            (
                product_id.as_str(),
                EntryRef {
                    sizes,
                    product: snapshots.get(product_id),
                },
            )
        })
        .collect();
    serde_json::to_string(&entries)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryShape {
    Current,
    Legacy,
    /// `{}`: carries nothing, valid under either shape.
    Empty,
}

fn classify_entry(product_id: &str, entry: &Map<String, Value>) -> Result<EntryShape, DecodeError> {
    if entry.is_empty() {
        return Ok(EntryShape::Empty);
    }

    let has_nested_sizes = matches!(entry.get(SIZES_FIELD), Some(Value::Object(_)));
    let only_known_fields = entry
        .keys()
        .all(|key| key == SIZES_FIELD || key == PRODUCT_FIELD);
    if has_nested_sizes && only_known_fields {
        return Ok(EntryShape::Current);
    }

    if entry.values().all(|value| !value.is_object() && !value.is_array()) {
        return Ok(EntryShape::Legacy);
    }

    Err(DecodeError::Malformed(format!(
        "entry for product {product_id:?} matches no known shape"
    )))
}

/// Decode a persisted blob.
///
/// Structural problems fail the whole blob. A single unreadable quantity only
/// drops that size, with a warning.
pub fn decode(raw: &str) -> Result<StoredCart, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(root) = value else {
        return Err(DecodeError::Malformed("top level is not an object".into()));
    };

    let mut entries = Vec::with_capacity(root.len());
    let mut saw_current = false;
    let mut saw_legacy = false;
    for (product_id, entry) in root {
        let Value::Object(entry) = entry else {
            return Err(DecodeError::Malformed(format!(
                "entry for product {product_id:?} is not an object"
            )));
        };
        let shape = classify_entry(&product_id, &entry)?;
        saw_current |= shape == EntryShape::Current;
        saw_legacy |= shape == EntryShape::Legacy;
        entries.push((product_id, shape, entry));
    }

    if saw_current && saw_legacy {
        return Err(DecodeError::Malformed(
            "blob mixes current and legacy entries".into(),
        ));
    }

    if saw_legacy {
        Ok(StoredCart::Legacy(decode_legacy(entries)))
    } else {
        Ok(decode_current(entries))
    }
}

fn decode_current(entries: Vec<(String, EntryShape, Map<String, Value>)>) -> StoredCart {
    let mut cart = Cart::new();
    let mut snapshots = BTreeMap::new();
    for (product_id, _, mut entry) in entries {
        if let Some(Value::Object(sizes)) = entry.remove(SIZES_FIELD) {
            read_sizes(&mut cart, &product_id, sizes);
        }
        match entry.remove(PRODUCT_FIELD) {
            None | Some(Value::Null) => {}
            Some(value) => match serde_json::from_value::<ProductSnapshot>(value) {
                Ok(snapshot) => {
                    snapshots.insert(product_id, snapshot);
                }
                Err(err) => {
                    tracing::warn!(product_id, error = %err, "ignoring unreadable product snapshot");
                }
            },
        }
    }
    snapshots.retain(|product_id, _| cart.contains_product(product_id));
    StoredCart::Current { cart, snapshots }
}

/// Migration step for the flat `productId -> size -> quantity` shape.
fn decode_legacy(entries: Vec<(String, EntryShape, Map<String, Value>)>) -> Cart {
    let mut cart = Cart::new();
    for (product_id, _, sizes) in entries {
        read_sizes(&mut cart, &product_id, sizes);
    }
    cart
}

fn read_sizes(cart: &mut Cart, product_id: &str, sizes: Map<String, Value>) {
    for (size, value) in sizes {
        if let Some(quantity) = read_quantity(product_id, &size, &value) {
            cart.set(product_id, &size, quantity);
        }
    }
}

fn read_quantity(product_id: &str, size: &str, value: &Value) -> Option<u32> {
    let quantity = match value {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        _ => None,
    };

    match quantity {
        Some(0) => None,
        Some(quantity) => match u32::try_from(quantity) {
            Ok(quantity) => Some(quantity),
            Err(_) => {
                tracing::warn!(product_id, size, quantity, "cart quantity out of range, skipped");
                None
            }
        },
        None => {
            tracing::warn!(product_id, size, value = %value, "invalid cart quantity, skipped");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str) -> ProductSnapshot {
        ProductSnapshot {
            name: name.to_string(),
            image: Some(format!("https://img.example/{name}.png")),
        }
    }

    #[test]
    fn encode_then_decode_preserves_contents() {
        let mut cart = Cart::new();
        cart.set("p1", "M", 2);
        cart.set("p1", "L", 1);
        cart.set("p2", "XL", 5);
        let mut snapshots = BTreeMap::new();
        snapshots.insert("p1".to_string(), snapshot("tee"));

        let raw = encode(&cart, &snapshots).unwrap();
        let decoded = decode(&raw).unwrap();
        assert_eq!(decoded, StoredCart::Current { cart, snapshots });

        // Re-encoding the decoded cart yields the same bytes.
        let StoredCart::Current { cart, snapshots } = decoded else {
            panic!("expected current shape");
        };
        assert_eq!(encode(&cart, &snapshots).unwrap(), raw);
    }

    #[test]
    fn encodes_nested_shape() {
        let mut cart = Cart::new();
        cart.set("p1", "M", 2);
        let raw = encode(&cart, &BTreeMap::new()).unwrap();
        assert_eq!(raw, r#"{"p1":{"sizes":{"M":2},"product":null}}"#);
    }

    #[test]
    fn legacy_blob_is_tagged() {
        let decoded = decode(r#"{"p1":{"M":2,"L":1},"p2":{"S":3}}"#).unwrap();
        let StoredCart::Legacy(cart) = decoded else {
            panic!("expected legacy shape");
        };
        assert_eq!(cart.quantity("p1", "M"), Some(2));
        assert_eq!(cart.quantity("p1", "L"), Some(1));
        assert_eq!(cart.quantity("p2", "S"), Some(3));
        assert_eq!(cart.count(), 6);
    }

    #[test]
    fn empty_blobs_decode_as_current() {
        assert_eq!(
            decode("{}").unwrap(),
            StoredCart::Current {
                cart: Cart::new(),
                snapshots: BTreeMap::new()
            }
        );
        let decoded = decode(r#"{"p1":{}}"#).unwrap();
        assert!(decoded.cart().is_empty());
    }

    #[test]
    fn invalid_quantities_are_skipped_not_fatal() {
        let decoded = decode(r#"{"p1":{"M":"two","L":-1,"S":1.5,"XL":0,"XXL":3}}"#).unwrap();
        let cart = decoded.cart();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity("p1", "XXL"), Some(3));
    }

    #[test]
    fn whole_float_quantities_are_accepted() {
        let decoded = decode(r#"{"p1":{"sizes":{"M":2.0}}}"#).unwrap();
        assert_eq!(decoded.cart().quantity("p1", "M"), Some(2));
    }

    #[test]
    fn product_with_only_invalid_sizes_is_dropped() {
        let decoded = decode(r#"{"p1":{"sizes":{"M":0}},"p2":{"sizes":{"S":1}}}"#).unwrap();
        assert!(!decoded.cart().contains_product("p1"));
        assert!(decoded.cart().contains_product("p2"));
    }

    #[test]
    fn unreadable_snapshot_is_ignored() {
        let decoded = decode(r#"{"p1":{"sizes":{"M":1},"product":{"title":"x"}}}"#).unwrap();
        let StoredCart::Current { cart, snapshots } = decoded else {
            panic!("expected current shape");
        };
        assert_eq!(cart.quantity("p1", "M"), Some(1));
        assert!(snapshots.is_empty());
    }

    #[test]
    fn malformed_structures_are_rejected() {
        for raw in [
            "not json",
            "[]",
            "42",
            r#"{"p1":3}"#,
            r#"{"p1":{"M":{"deep":1}}}"#,
            r#"{"p1":{"sizes":{"M":1}},"p2":{"S":1}}"#,
        ] {
            assert!(decode(raw).is_err(), "expected {raw} to be rejected");
        }
    }
}
