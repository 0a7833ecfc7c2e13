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
    domain::{
        cart::{Cart, CartItem, CheckoutSummary},
        order::{OrderStatus, PaymentMethod, PaymentStatus},
        product::Category,
    },
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, ApplyCouponRequest, UpdateCartItemRequest},
        orders::{
            CreateOrderRequest, OrderItemInput, UpdateOrderStatusRequest, UpdateTrackingRequest,
        },
        products::{CreateProductRequest, UpdateProductRequest},
        users::{AddressInput, UpdateProfileRequest, VendorProfileRequest},
    },
    error::{ErrorBody, FieldError, ValidationBody},
    models::{Address, Order, OrderItem, Product, User, UserRole, VendorProfile},
    response::{MessageResponse, Meta, Paginated},
    routes::{auth, cart, health, orders, products, users},
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
        auth::register,
        auth::login,
        users::get_me,
        users::update_me,
        users::add_address,
        users::remove_address,
        users::upsert_vendor_profile,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        cart::get_cart,
        cart::add_item,
        cart::update_item,
        cart::remove_item,
        cart::apply_coupon,
        cart::remove_coupon,
        cart::clear_cart,
        cart::checkout,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::update_status,
        orders::cancel_order,
        orders::update_tracking
    ),
    components(
        schemas(
            User,
            UserRole,
            Address,
            VendorProfile,
            Product,
            Category,
            Cart,
            CartItem,
            CheckoutSummary,
            Order,
            OrderItem,
            OrderStatus,
            PaymentMethod,
            PaymentStatus,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UpdateProfileRequest,
            AddressInput,
            VendorProfileRequest,
            CreateProductRequest,
            UpdateProductRequest,
            AddToCartRequest,
            UpdateCartItemRequest,
            ApplyCouponRequest,
            CreateOrderRequest,
            OrderItemInput,
            UpdateOrderStatusRequest,
            UpdateTrackingRequest,
            health::HealthData,
            Meta,
            MessageResponse,
            ErrorBody,
            FieldError,
            ValidationBody,
            Paginated<Product>,
            Paginated<Order>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "Profile, address book and vendor profile"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Cart", description = "Per-user shopping cart"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
