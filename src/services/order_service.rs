use crate::{
    checkout::{DEFAULT_PAYMENT_METHOD, OrderRequest},
    dto::orders::{CheckoutRequest, CheckoutResponse, OrderList},
    error::AppResult,
    middleware::auth::BearerToken,
    response::{ApiResponse, Meta},
    services::product_service::ready_catalog,
    state::AppState,
};

/// Price the cart, submit it to the backend and empty the cart once the
/// backend accepts the order.
///
/// The cart stays locked for the whole exchange so it cannot change between
/// pricing and clearing.
pub async fn checkout(
    state: &AppState,
    token: &BearerToken,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let catalog = ready_catalog(state).await?;
    let mut cart = state.cart.lock().await;

    let payment_method = payload
        .payment_method
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_PAYMENT_METHOD);
    let order = OrderRequest::build(
        &cart.lines(),
        &catalog,
        &payload.shipping,
        payment_method,
        state.config.delivery_fee,
    )?;

    let receipt = state.orders.submit(token.as_str(), &order).await?;
    tracing::info!(
        lines = order.products.len(),
        total = %order.total_amount,
        "order placed"
    );
    cart.clear();

    Ok(ApiResponse::success(
        "Order placed",
        CheckoutResponse { order, receipt },
        Some(Meta::empty().with_currency(state.config.currency.clone())),
    ))
}

pub async fn list_orders(
    state: &AppState,
    token: &BearerToken,
) -> AppResult<ApiResponse<OrderList>> {
    let items = state.orders.user_orders(token.as_str()).await?;
    let meta = Meta::total(items.len()).with_currency(state.config.currency.clone());
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}
