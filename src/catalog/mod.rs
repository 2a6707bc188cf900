//! Read-only product catalog fetched from the backend.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::models::Product;

pub mod client;
pub mod collection;

pub use client::{CatalogClient, CatalogError};
pub use collection::{CollectionQuery, SortType};

/// Products indexed by id, in the order the backend returned them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, dropping products with an empty id or a negative
    /// price. The first product wins when ids repeat.
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut kept = Vec::with_capacity(products.len());
        let mut index = HashMap::with_capacity(products.len());
        for product in products {
            if product.id.trim().is_empty() {
                tracing::warn!(name = %product.name, "dropping catalog product without id");
                continue;
            }
            if product.price < Decimal::ZERO {
                tracing::warn!(product_id = %product.id, price = %product.price, "dropping catalog product with negative price");
                continue;
            }
            match index.entry(product.id.clone()) {
                Entry::Occupied(_) => {
                    tracing::warn!(product_id = %product.id, "duplicate catalog product ignored");
                }
                Entry::Vacant(slot) => {
                    slot.insert(kept.len());
                    kept.push(product);
                }
            }
        }
        Self {
            products: kept,
            index,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.index.get(id).and_then(|&i| self.products.get(i))
    }

    /// A `product id -> product` lookup for cart pricing.
    pub fn lookup<'a>(&'a self) -> impl Fn(&str) -> Option<&'a Product> + 'a {
        move |id| self.get(id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Observable state of the catalog fetch.
///
/// Once a catalog has loaded it stays `Ready`: a refresh in flight sets
/// `refreshing`, and a failed refresh keeps the previous products and records
/// the error in `last_error`. `Loading` and `Failed` only describe a handle
/// that has never loaded.
#[derive(Debug, Clone)]
pub enum CatalogState {
    Loading,
    Ready {
        catalog: Arc<Catalog>,
        refreshing: bool,
        last_error: Option<String>,
    },
    Failed(String),
}

impl CatalogState {
    fn ready(catalog: Arc<Catalog>) -> Self {
        CatalogState::Ready {
            catalog,
            refreshing: false,
            last_error: None,
        }
    }
}

/// Shared, refreshable catalog state.
#[derive(Clone)]
pub struct CatalogHandle {
    state: Arc<RwLock<CatalogState>>,
}

impl Default for CatalogHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogHandle {
    /// A handle whose first fetch has not completed yet.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(CatalogState::Loading)),
        }
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            state: Arc::new(RwLock::new(CatalogState::ready(Arc::new(catalog)))),
        }
    }

    pub async fn state(&self) -> CatalogState {
        self.state.read().await.clone()
    }

    /// The last loaded catalog, or `None` if no fetch has succeeded yet.
    pub async fn ready(&self) -> Option<Arc<Catalog>> {
        match &*self.state.read().await {
            CatalogState::Ready { catalog, .. } => Some(catalog.clone()),
            _ => None,
        }
    }

    /// Fetch the catalog again. A handle that already holds a catalog keeps
    /// serving it while the fetch runs and after it fails.
    pub async fn refresh(&self, client: &CatalogClient) -> Result<Arc<Catalog>, CatalogError> {
        {
            let mut state = self.state.write().await;
            match &mut *state {
                CatalogState::Ready { refreshing, .. } => *refreshing = true,
                other => *other = CatalogState::Loading,
            }
        }

        match client.fetch().await {
            Ok(catalog) => {
                let catalog = Arc::new(catalog);
                tracing::info!(products = catalog.len(), "catalog loaded");
                *self.state.write().await = CatalogState::ready(catalog.clone());
                Ok(catalog)
            }
            Err(err) => {
                let mut state = self.state.write().await;
                match &mut *state {
                    CatalogState::Ready {
                        catalog,
                        refreshing,
                        last_error,
                    } => {
                        tracing::warn!(
                            error = %err,
                            products = catalog.len(),
                            "catalog refresh failed, keeping previous catalog"
                        );
                        *refreshing = false;
                        *last_error = Some(err.to_string());
                    }
                    other => {
                        tracing::error!(error = %err, "catalog fetch failed");
                        *other = CatalogState::Failed(err.to_string());
                    }
                }
                Err(err)
            }
        }
    }
}
