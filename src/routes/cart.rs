use axum::{
    Router,
    extract::State,
    routing::{delete, patch, post},
};
use uuid::Uuid;

use crate::{
    domain::cart::{Cart, CheckoutSummary},
    dto::cart::{AddToCartRequest, ApplyCouponRequest, UpdateCartItemRequest},
    error::AppResult,
    extract::{Json, Path},
    middleware::auth::AuthUser,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(get_cart).delete(clear_cart))
        .route("/items", post(add_item))
        .route("/items/{product_id}", patch(update_item).delete(remove_item))
        .route("/apply-coupon", post(apply_coupon))
        .route("/coupon", delete(remove_coupon))
        .route("/checkout", post(checkout))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "The caller's cart, created on first access", body = Cart)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Cart>> {
    Ok(Json(cart_service::get_cart(&state, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added", body = Cart),
        (status = 400, description = "Validation failed or insufficient stock"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<Cart>> {
    Ok(Json(cart_service::add_item(&state, &user, payload).await?))
}

#[utoipa::path(
    patch,
    path = "/api/cart/items/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity set; 0 removes the item", body = Cart),
        (status = 404, description = "Item not in cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> AppResult<Json<Cart>> {
    Ok(Json(
        cart_service::update_item(&state, &user, product_id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Item removed", body = Cart),
        (status = 404, description = "Item not in cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Cart>> {
    Ok(Json(
        cart_service::remove_item(&state, &user, product_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/cart/apply-coupon",
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Coupon applied", body = Cart),
        (status = 400, description = "Invalid coupon code"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn apply_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ApplyCouponRequest>,
) -> AppResult<Json<Cart>> {
    Ok(Json(
        cart_service::apply_coupon(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/cart/coupon",
    responses((status = 200, description = "Coupon removed", body = Cart)),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_coupon(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Cart>> {
    Ok(Json(cart_service::remove_coupon(&state, &user).await?))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses((status = 200, description = "Cart emptied", body = Cart)),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Cart>> {
    Ok(Json(cart_service::clear_cart(&state, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/cart/checkout",
    responses(
        (status = 200, description = "Cart snapshot; the cart is emptied", body = CheckoutSummary),
        (status = 400, description = "Cart is empty"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<CheckoutSummary>> {
    Ok(Json(cart_service::checkout(&state, &user).await?))
}
