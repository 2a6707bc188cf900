use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    cart::CartStore,
    catalog::{CatalogClient, CatalogHandle},
    checkout::OrderClient,
    config::AppConfig,
    storage::DurableStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cart: Arc<Mutex<CartStore>>,
    pub catalog: CatalogHandle,
    pub catalog_client: CatalogClient,
    pub orders: OrderClient,
}

impl AppState {
    /// Wire the cart to `storage` and both backend clients to `config.backend_url`.
    /// The catalog starts out `Loading`; call [`CatalogHandle::refresh`] to fill it.
    pub fn new(config: AppConfig, storage: Arc<dyn DurableStore>, http: reqwest::Client) -> Self {
        let catalog_client = CatalogClient::new(http.clone(), &config.backend_url);
        let orders = OrderClient::new(http, &config.backend_url);
        Self {
            cart: Arc::new(Mutex::new(CartStore::open(storage))),
            catalog: CatalogHandle::new(),
            catalog_client,
            orders,
            config: Arc::new(config),
        }
    }
}
