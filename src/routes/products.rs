use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};

use crate::{
    dto::products::{CatalogRefresh, ProductDetail, ProductList},
    error::AppResult,
    response::ApiResponse,
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/bestsellers", get(bestsellers))
        .route("/latest", get(latest))
        .route("/refresh", post(refresh_catalog))
        .route("/{id}", get(get_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Filtered and sorted products", body = ApiResponse<ProductList>),
        (status = 502, description = "Catalog fetch failed"),
        (status = 503, description = "Catalog still loading"),
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    Ok(Json(product_service::list_products(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/products/bestsellers",
    responses(
        (status = 200, description = "Bestseller shelf", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn bestsellers(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ProductList>>> {
    Ok(Json(product_service::bestsellers(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/products/latest",
    responses(
        (status = 200, description = "Latest collection shelf", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn latest(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ProductList>>> {
    Ok(Json(product_service::latest(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with related products", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    Ok(Json(product_service::get_product(&state, &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/products/refresh",
    responses(
        (status = 200, description = "Catalog re-fetched from the backend", body = ApiResponse<CatalogRefresh>),
        (status = 502, description = "Catalog fetch failed"),
    ),
    tag = "Products"
)]
pub async fn refresh_catalog(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CatalogRefresh>>> {
    Ok(Json(product_service::refresh_catalog(&state).await?))
}
