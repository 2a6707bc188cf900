#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use storefront_cart::{
    catalog::{Catalog, CatalogHandle},
    checkout::ShippingDetails,
    config::AppConfig,
    models::Product,
    state::AppState,
    storage::{DurableStore, MemoryStore},
};

pub fn product(id: &str, price: i64) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        description: String::new(),
        price: Decimal::from(price),
        images: vec![format!("https://img.example.com/{id}.png")],
        sizes: vec!["S".into(), "M".into(), "L".into()],
        category: "Men".into(),
        sub_category: "Topwear".into(),
        created_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        bestseller: false,
    }
}

pub fn config(backend_url: &str) -> AppConfig {
    AppConfig {
        backend_url: backend_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        storage_dir: PathBuf::from(".unused"),
        currency: "$".into(),
        delivery_fee: Decimal::from(10),
    }
}

/// State backed by an in-memory store; the catalog stays `Loading`.
pub fn state_with_store(store: MemoryStore, backend_url: &str) -> AppState {
    let storage: Arc<dyn DurableStore> = Arc::new(store);
    AppState::new(config(backend_url), storage, reqwest::Client::new())
}

pub fn state_with_catalog(store: MemoryStore, backend_url: &str, products: Vec<Product>) -> AppState {
    let mut state = state_with_store(store, backend_url);
    state.catalog = CatalogHandle::with_catalog(Catalog::from_products(products));
    state
}

pub fn shipping() -> ShippingDetails {
    ShippingDetails {
        full_name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
        phone: "5550100".into(),
        address: "1 Analytical Way".into(),
        city: "London".into(),
        postal_code: Some("N1 9GU".into()),
        country: "UK".into(),
    }
}
