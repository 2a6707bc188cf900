use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};

use crate::{
    dto::cart::{AddToCartRequest, CartCount, CartLineQuantity, CartView, UpdateQuantityRequest},
    error::AppResult,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart_view)
                .post(add_to_cart)
                .put(update_quantity)
                .delete(clear_cart),
        )
        .route("/count", get(cart_count))
        .route("/{product_id}/{size}", delete(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart lines with resolved products and totals", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn cart_view(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(cart_service::view_cart(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/cart/count",
    responses(
        (status = 200, description = "Total units in the cart", body = ApiResponse<CartCount>)
    ),
    tag = "Cart"
)]
pub async fn cart_count(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CartCount>>> {
    Ok(Json(cart_service::cart_count(&state).await?))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add one unit of a product in a size", body = ApiResponse<CartLineQuantity>),
        (status = 400, description = "Missing product id or size selection"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartLineQuantity>>> {
    Ok(Json(cart_service::add_to_cart(&state, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/cart",
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Set a line's quantity; zero removes it", body = ApiResponse<CartLineQuantity>),
        (status = 400, description = "Missing product id or size selection"),
    ),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartLineQuantity>>> {
    Ok(Json(cart_service::update_quantity(&state, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{product_id}/{size}",
    params(
        ("product_id" = String, Path, description = "Product ID"),
        ("size" = String, Path, description = "Size label")
    ),
    responses(
        (status = 200, description = "OK", body = ApiResponse<serde_json::Value>),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path((product_id, size)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        cart_service::remove_from_cart(&state, &product_id, &size).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart emptied and its persisted copy removed", body = ApiResponse<serde_json::Value>),
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(cart_service::clear_cart(&state).await?))
}
