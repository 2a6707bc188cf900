use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    cart::CartError,
    catalog::CatalogError,
    checkout::CheckoutError,
    response::{ApiResponse, Meta},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Unauthorized {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Cart(#[from] CartError),

    #[error("Catalog is still loading")]
    CatalogLoading,

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Checkout(#[from] CheckoutError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Cart(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::CatalogLoading => StatusCode::SERVICE_UNAVAILABLE,
            AppError::CatalogUnavailable(_) | AppError::Catalog(_) => StatusCode::BAD_GATEWAY,
            AppError::Checkout(err) => match err {
                CheckoutError::MissingFields(_)
                | CheckoutError::EmptyCart
                | CheckoutError::UnknownProduct(_)
                | CheckoutError::AmountOverflow => StatusCode::BAD_REQUEST,
                CheckoutError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutError::Status { status, .. } if *status == 401 || *status == 403 => {
                    StatusCode::UNAUTHORIZED
                }
                CheckoutError::Http(_)
                | CheckoutError::Status { .. }
                | CheckoutError::InvalidPayload(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_statuses() {
        assert_eq!(
            AppError::Cart(CartError::MissingSize).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::CatalogLoading.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            AppError::Checkout(CheckoutError::Status {
                status: 401,
                message: "jwt expired".into()
            })
            .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Checkout(CheckoutError::Rejected("out of stock".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn cart_errors_keep_user_facing_message() {
        assert_eq!(
            AppError::Cart(CartError::MissingSize).to_string(),
            "missing size selection"
        );
    }
}
