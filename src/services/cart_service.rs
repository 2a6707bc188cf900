use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    cart::CartStore,
    catalog::Catalog,
    checkout::CartTotals,
    dto::cart::{AddToCartRequest, CartCount, CartItemDto, CartLineQuantity, CartView, UpdateQuantityRequest},
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// The loaded catalog, or an empty one while it is loading or unavailable.
/// Cart pages stay usable either way; unresolved lines show placeholders.
async fn catalog_or_empty(state: &AppState) -> Arc<Catalog> {
    state.catalog.ready().await.unwrap_or_default()
}

fn build_view(store: &CartStore, catalog: &Catalog, delivery_fee: Decimal) -> CartView {
    let items = store
        .lines()
        .into_iter()
        .map(|line| match catalog.get(&line.product_id) {
            Some(product) => CartItemDto {
                name: product.name.clone(),
                price: product.price,
                image: product.first_image().map(str::to_string),
                line_total: product
                    .price
                    .checked_mul(Decimal::from(line.quantity))
                    .unwrap_or(Decimal::ZERO),
                resolved: true,
                product_id: line.product_id,
                size: line.size,
                quantity: line.quantity,
            },
            None => {
                let snapshot = store.snapshot(&line.product_id);
                CartItemDto {
                    name: snapshot
                        .map(|s| s.name.clone())
                        .unwrap_or_else(|| format!("Product #{}", line.product_id)),
                    price: Decimal::ZERO,
                    image: snapshot.and_then(|s| s.image.clone()),
                    line_total: Decimal::ZERO,
                    resolved: false,
                    product_id: line.product_id,
                    size: line.size,
                    quantity: line.quantity,
                }
            }
        })
        .collect();

    let subtotal = store.amount(catalog.lookup());
    CartView {
        items,
        count: store.count(),
        totals: CartTotals::new(subtotal, delivery_fee),
    }
}

pub async fn view_cart(state: &AppState) -> AppResult<ApiResponse<CartView>> {
    let catalog = catalog_or_empty(state).await;
    let store = state.cart.lock().await;
    let view = build_view(&store, &catalog, state.config.delivery_fee);
    let meta = Meta::total(view.items.len()).with_currency(state.config.currency.clone());
    Ok(ApiResponse::success("OK", view, Some(meta)))
}

pub async fn cart_count(state: &AppState) -> AppResult<ApiResponse<CartCount>> {
    let count = state.cart.lock().await.count();
    Ok(ApiResponse::success("OK", CartCount { count }, None))
}

pub async fn add_to_cart(
    state: &AppState,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartLineQuantity>> {
    let product_id = payload.product_id.trim();
    let size = payload.size.trim();
    let quantity = state.cart.lock().await.add_line(product_id, size)?;

    Ok(ApiResponse::success(
        "Added to cart",
        CartLineQuantity {
            product_id: product_id.to_string(),
            size: size.to_string(),
            quantity,
        },
        None,
    ))
}

pub async fn update_quantity(
    state: &AppState,
    payload: UpdateQuantityRequest,
) -> AppResult<ApiResponse<CartLineQuantity>> {
    let product_id = payload.product_id.trim();
    let size = payload.size.trim();
    state
        .cart
        .lock()
        .await
        .set_quantity(product_id, size, payload.quantity)?;

    let message = if payload.quantity == 0 {
        "Removed from cart"
    } else {
        "Updated"
    };
    Ok(ApiResponse::success(
        message,
        CartLineQuantity {
            product_id: product_id.to_string(),
            size: size.to_string(),
            quantity: payload.quantity,
        },
        None,
    ))
}

pub async fn remove_from_cart(
    state: &AppState,
    product_id: &str,
    size: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .cart
        .lock()
        .await
        .remove_line(product_id.trim(), size.trim())?;
    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn clear_cart(state: &AppState) -> AppResult<ApiResponse<serde_json::Value>> {
    state.cart.lock().await.clear();
    Ok(ApiResponse::success(
        "Cart cleared",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
