use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::orders::{CheckoutRequest, CheckoutResponse, OrderList},
    error::AppResult,
    middleware::auth::BearerToken,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn route() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/checkout", post(checkout))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders placed by the current user", body = ApiResponse<OrderList>),
        (status = 401, description = "Missing or rejected bearer token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    token: BearerToken,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    Ok(Json(order_service::list_orders(&state, &token).await?))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order submitted and cart emptied", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Missing shipping fields, empty cart or unknown product"),
        (status = 401, description = "Missing or rejected bearer token"),
        (status = 422, description = "Backend declined the order"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    token: BearerToken,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutResponse>>> {
    Ok(Json(order_service::checkout(&state, &token, payload).await?))
}
