use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;

use super::codec::{self, StoredCart};
use super::{CART_STORAGE_KEY, Cart, CartError, validate_line_key};
use crate::catalog::Catalog;
use crate::models::{CartLine, Product, ProductSnapshot};
use crate::storage::DurableStore;

/// The user's in-progress selection, written through to a [`DurableStore`]
/// after every mutation.
///
/// Loading never fails: an unreadable blob is logged and the store starts
/// empty. Write failures are logged as well and leave the in-memory cart as
/// the source of truth for the rest of the session.
pub struct CartStore {
    storage: Arc<dyn DurableStore>,
    cart: Cart,
    snapshots: BTreeMap<String, ProductSnapshot>,
}

impl CartStore {
    /// Restore the cart from `storage`, upgrading a legacy blob in place.
    pub fn open(storage: Arc<dyn DurableStore>) -> Self {
        let mut store = Self {
            storage,
            cart: Cart::new(),
            snapshots: BTreeMap::new(),
        };
        store.reload();
        store
    }

    /// Re-read the durable store, replacing the in-memory state.
    ///
    /// Used at startup and whenever another writer may have touched the blob.
    pub fn reload(&mut self) {
        self.cart = Cart::new();
        self.snapshots.clear();

        let raw = match self.storage.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(err) => {
                tracing::warn!(error = %err, "could not read persisted cart, starting empty");
                return;
            }
        };

        match codec::decode(&raw) {
            Ok(StoredCart::Current { cart, snapshots }) => {
                self.cart = cart;
                self.snapshots = snapshots;
                tracing::debug!(lines = self.cart.lines().len(), "cart restored");
            }
            Ok(StoredCart::Legacy(cart)) => {
                tracing::info!(
                    lines = cart.lines().len(),
                    "migrating legacy cart blob to current shape"
                );
                self.cart = cart;
                self.persist();
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable persisted cart");
                if let Err(err) = self.storage.remove(CART_STORAGE_KEY) {
                    tracing::warn!(error = %err, "could not remove unreadable cart blob");
                }
            }
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Add one unit of `product_id` in `size`. Returns the line's new quantity.
    pub fn add_line(&mut self, product_id: &str, size: &str) -> Result<u32, CartError> {
        validate_line_key(product_id, size)?;
        let quantity = self.cart.increment(product_id, size);
        tracing::debug!(product_id, size, quantity, "cart line added");
        self.persist();
        Ok(quantity)
    }

    /// Set the quantity of a line; zero removes it.
    pub fn set_quantity(
        &mut self,
        product_id: &str,
        size: &str,
        quantity: u32,
    ) -> Result<(), CartError> {
        validate_line_key(product_id, size)?;
        self.cart.set(product_id, size, quantity);
        if !self.cart.contains_product(product_id) {
            self.snapshots.remove(product_id);
        }
        tracing::debug!(product_id, size, quantity, "cart quantity set");
        self.persist();
        Ok(())
    }

    pub fn remove_line(&mut self, product_id: &str, size: &str) -> Result<(), CartError> {
        self.set_quantity(product_id, size, 0)
    }

    /// Empty the cart and delete the persisted blob.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.snapshots.clear();
        if let Err(err) = self.storage.remove(CART_STORAGE_KEY) {
            tracing::warn!(error = %err, "could not remove persisted cart");
        }
        tracing::debug!("cart cleared");
    }

    pub fn count(&self) -> u64 {
        self.cart.count()
    }

    pub fn amount<'a, F>(&self, lookup: F) -> Decimal
    where
        F: Fn(&str) -> Option<&'a Product>,
    {
        self.cart.amount(lookup)
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.cart.lines()
    }

    /// Last known display metadata for a product in the cart.
    pub fn snapshot(&self, product_id: &str) -> Option<&ProductSnapshot> {
        self.snapshots.get(product_id)
    }

    /// Refresh snapshots from `catalog`. Products the catalog does not know
    /// keep their previous snapshot. Returns whether anything changed.
    pub fn sync_catalog(&mut self, catalog: &Catalog) -> bool {
        let mut changed = false;
        let product_ids: Vec<String> = self.cart.product_ids().map(str::to_string).collect();
        for product_id in product_ids {
            let Some(product) = catalog.get(&product_id) else {
                continue;
            };
            let fresh = ProductSnapshot::from(product);
            if self.snapshots.get(&product_id) != Some(&fresh) {
                self.snapshots.insert(product_id, fresh);
                changed = true;
            }
        }

        if changed {
            tracing::debug!("cart snapshots refreshed from catalog");
            self.persist();
        }
        changed
    }

    fn persist(&self) {
        let raw = match codec::encode(&self.cart, &self.snapshots) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!(error = %err, "could not encode cart");
                return;
            }
        };
        if let Err(err) = self.storage.set(CART_STORAGE_KEY, &raw) {
            tracing::warn!(error = %err, "could not persist cart");
        }
    }
}
