use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    catalog::CatalogState,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    /// `loading`, `ready`, `refreshing` or `failed`
    pub catalog: String,
    pub products: usize,
    /// Error of the last refresh, when the previous catalog is still served
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
        tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthData>> {
    let (catalog, products, catalog_error) = match state.catalog.state().await {
        CatalogState::Loading => ("loading", 0, None),
        CatalogState::Ready {
            catalog,
            refreshing,
            last_error,
        } => {
            let label = if refreshing { "refreshing" } else { "ready" };
            (label, catalog.len(), last_error)
        }
        CatalogState::Failed(message) => ("failed", 0, Some(message)),
    };
    let data = HealthData {
        status: "ok".to_string(),
        catalog: catalog.to_string(),
        products,
        catalog_error,
    };

    Json(ApiResponse::success(
        "Health check",
        data,
        Some(Meta::empty()),
    ))
}
