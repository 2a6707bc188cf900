use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    catalog::SortType,
    checkout::{CartTotals, OrderAddress, OrderProduct, OrderReceipt, OrderRequest, OrderSummary, ShippingDetails},
    dto::{
        cart::{AddToCartRequest, CartCount, CartItemDto, CartLineQuantity, CartView, UpdateQuantityRequest},
        orders::{CheckoutRequest, CheckoutResponse, OrderList},
        products::{CatalogRefresh, ProductDetail, ProductList},
    },
    models::{CartLine, Product, ProductSnapshot},
    response::{ApiResponse, Meta},
    routes::{cart, health, orders, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::bestsellers,
        products::latest,
        products::get_product,
        products::refresh_catalog,
        cart::cart_view,
        cart::cart_count,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        orders::list_orders,
        orders::checkout
    ),
    components(
        schemas(
            Product,
            ProductSnapshot,
            CartLine,
            SortType,
            params::Pagination,
            ProductList,
            ProductDetail,
            CatalogRefresh,
            AddToCartRequest,
            UpdateQuantityRequest,
            CartItemDto,
            CartView,
            CartCount,
            CartLineQuantity,
            CartTotals,
            ShippingDetails,
            OrderProduct,
            OrderAddress,
            OrderRequest,
            OrderReceipt,
            OrderSummary,
            CheckoutRequest,
            CheckoutResponse,
            OrderList,
            health::HealthData,
            Meta,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<CheckoutResponse>,
            ApiResponse<OrderList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog browsing endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Checkout and order history endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
