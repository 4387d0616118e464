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
    dto::{
        cart::{AddToCartRequest, CartStatus},
        orders::{OrderDetail, OrderLineView, OrderPage, RecentOrder, RecentOrderList, UpdateOrderStatusRequest},
        products::{ProductList, ProductView},
        wishlist::{AddWishlistRequest, WishlistStatus},
    },
    models::{CartItem, Order, OrderLine, OrderStatus, Product, ShippingAddress, WishlistEntry},
    response::{ApiResponse, Meta},
    routes::{cart, health, orders, params, products, reports, wishlist},
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
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::list_orders,
        orders::recent_orders,
        orders::get_order,
        orders::update_order_status,
        products::list_products,
        products::get_product,
        wishlist::check_membership,
        wishlist::add_entry,
        wishlist::remove_entry,
        cart::check_membership,
        cart::add_to_cart,
        reports::export_orders
    ),
    components(
        schemas(
            Order,
            OrderStatus,
            OrderLine,
            ShippingAddress,
            Product,
            WishlistEntry,
            CartItem,
            OrderPage,
            OrderDetail,
            OrderLineView,
            RecentOrder,
            RecentOrderList,
            UpdateOrderStatusRequest,
            ProductList,
            ProductView,
            AddWishlistRequest,
            WishlistStatus,
            AddToCartRequest,
            CartStatus,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderPage>,
            ApiResponse<OrderDetail>,
            ApiResponse<RecentOrderList>,
            ApiResponse<ProductList>,
            ApiResponse<ProductView>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Admin order management"),
        (name = "Products", description = "Storefront product reads"),
        (name = "Wishlist", description = "Wishlist membership"),
        (name = "Cart", description = "Cart membership"),
        (name = "Reports", description = "CSV exports"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
