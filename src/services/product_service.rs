use std::sync::Arc;

use crate::{
    catalog::{Catalog, CatalogState, collection},
    dto::products::{CatalogRefresh, ProductDetail, ProductList},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    state::AppState,
};

/// The loaded catalog, or the error matching why there is none.
pub async fn ready_catalog(state: &AppState) -> AppResult<Arc<Catalog>> {
    match state.catalog.state().await {
        CatalogState::Ready { catalog, .. } => Ok(catalog),
        CatalogState::Loading => Err(AppError::CatalogLoading),
        CatalogState::Failed(message) => Err(AppError::CatalogUnavailable(message)),
    }
}

fn owned(products: Vec<&Product>) -> Vec<Product> {
    products.into_iter().cloned().collect()
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let catalog = ready_catalog(state).await?;
    let (page, limit, offset) = query.pagination().normalize();

    let matching = query.collection().apply(&catalog);
    let total = matching.len();
    let items = matching
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(0))
        .cloned()
        .collect();

    let total = i64::try_from(total).unwrap_or(i64::MAX);
    let meta = Meta::new(page, limit, total).with_currency(state.config.currency.clone());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn bestsellers(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    let catalog = ready_catalog(state).await?;
    let items = owned(collection::bestsellers(&catalog));
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Bestsellers", ProductList { items }, Some(meta)))
}

pub async fn latest(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    let catalog = ready_catalog(state).await?;
    let items = owned(collection::latest(&catalog));
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Latest collection", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: &str) -> AppResult<ApiResponse<ProductDetail>> {
    let catalog = ready_catalog(state).await?;
    let product = catalog.get(id).ok_or(AppError::NotFound)?;
    let related = owned(collection::related(&catalog, product));

    Ok(ApiResponse::success(
        "Product",
        ProductDetail {
            product: product.clone(),
            related,
        },
        Some(Meta::empty().with_currency(state.config.currency.clone())),
    ))
}

/// Re-fetch the catalog and refresh the cart's product snapshots from it.
pub async fn refresh_catalog(state: &AppState) -> AppResult<ApiResponse<CatalogRefresh>> {
    let catalog = state.catalog.refresh(&state.catalog_client).await?;
    let cart_snapshots_updated = state.cart.lock().await.sync_catalog(&catalog);

    Ok(ApiResponse::success(
        "Catalog refreshed",
        CatalogRefresh {
            products: catalog.len(),
            cart_snapshots_updated,
        },
        Some(Meta::empty()),
    ))
}
