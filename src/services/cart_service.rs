//! Cart handlers: load or create the caller's cart, mutate it through the
//! aggregate, persist the whole document back.
//!
//! No lock is taken between loading and saving. Two concurrent mutations of
//! the same cart are last-write-wins, and the stock check in [`add_item`]
//! is a separate read from the write that follows it.

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::{
        cart::{Cart, CheckoutSummary},
        coupon::Coupon,
    },
    dto::cart::{AddToCartRequest, ApplyCouponRequest, UpdateCartItemRequest},
    entity::{
        carts::{ActiveModel as CartActive, CartLines, Column as CartCol, Entity as Carts, Model as CartModel},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    state::AppState,
};

/// The user's cart, created empty on first access.
///
/// Creation relies on the unique `carts.user_id` constraint: a request that
/// loses the insert race re-reads the cart the winner stored.
pub async fn find_or_create(state: &AppState, user_id: Uuid) -> AppResult<Cart> {
    if let Some(model) = find_by_user(state, user_id).await? {
        return Ok(cart_from_entity(model));
    }

    let cart = Cart::new(Uuid::new_v4(), user_id);
    let active = CartActive {
        id: Set(cart.id()),
        user_id: Set(user_id),
        items: Set(CartLines::default()),
        subtotal: Set(cart.subtotal()),
        tax: Set(cart.tax()),
        shipping_cost: Set(cart.shipping_cost()),
        total: Set(cart.total()),
        coupon_code: Set(None),
        coupon_discount: Set(cart.coupon_discount()),
        created_at: Set(cart.created_at().into()),
        updated_at: Set(cart.updated_at().into()),
    };

    match active.insert(&state.orm).await {
        Ok(model) => {
            tracing::info!(user_id = %user_id, cart_id = %model.id, "cart created");
            Ok(cart_from_entity(model))
        }
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            let model = find_by_user(state, user_id)
                .await?
                .ok_or_else(|| AppError::not_found("Cart"))?;
            Ok(cart_from_entity(model))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<Cart> {
    find_or_create(state, user.user_id).await
}

pub async fn add_item(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<Cart> {
    payload.validate()?;

    let product: Product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?
        .map(Product::from)
        .ok_or_else(|| AppError::not_found("Product"))?;

    if !product.can_supply(payload.quantity) {
        return Err(AppError::BadRequest(format!(
            "Insufficient stock for {}",
            product.name
        )));
    }

    let mut cart = find_or_create(state, user.user_id).await?;
    cart.add_item(&product, payload.quantity)?;
    let cart = save(state, &cart).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "cart_add_item",
        "carts",
        serde_json::json!({ "product_id": product.id, "quantity": payload.quantity }),
    )
    .await;

    Ok(cart)
}

pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<Cart> {
    payload.validate()?;

    let mut cart = find_or_create(state, user.user_id).await?;
    cart.update_item_quantity(product_id, payload.quantity)?;
    let cart = save(state, &cart).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "cart_update_item",
        "carts",
        serde_json::json!({ "product_id": product_id, "quantity": payload.quantity }),
    )
    .await;

    Ok(cart)
}

pub async fn remove_item(state: &AppState, user: &AuthUser, product_id: Uuid) -> AppResult<Cart> {
    let mut cart = find_or_create(state, user.user_id).await?;
    cart.remove_item(product_id)?;
    let cart = save(state, &cart).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "cart_remove_item",
        "carts",
        serde_json::json!({ "product_id": product_id }),
    )
    .await;

    Ok(cart)
}

pub async fn apply_coupon(
    state: &AppState,
    user: &AuthUser,
    payload: ApplyCouponRequest,
) -> AppResult<Cart> {
    payload.validate()?;
    // Unknown codes are rejected before the cart is touched.
    let coupon: Coupon = payload.code.parse()?;

    let mut cart = find_or_create(state, user.user_id).await?;
    cart.apply_coupon(coupon);
    let cart = save(state, &cart).await?;

    tracing::debug!(user_id = %user.user_id, coupon = %coupon, discount = %cart.coupon_discount(), "coupon applied");
    audit::record(
        &state.pool,
        user.user_id,
        "cart_apply_coupon",
        "carts",
        serde_json::json!({ "coupon": coupon.code(), "discount": cart.coupon_discount() }),
    )
    .await;

    Ok(cart)
}

pub async fn remove_coupon(state: &AppState, user: &AuthUser) -> AppResult<Cart> {
    let mut cart = find_or_create(state, user.user_id).await?;
    cart.remove_coupon();
    let cart = save(state, &cart).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "cart_remove_coupon",
        "carts",
        serde_json::json!({ "cart_id": cart.id() }),
    )
    .await;

    Ok(cart)
}

pub async fn clear_cart(state: &AppState, user: &AuthUser) -> AppResult<Cart> {
    let mut cart = find_or_create(state, user.user_id).await?;
    cart.clear();
    let cart = save(state, &cart).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "cart_clear",
        "carts",
        serde_json::json!({ "cart_id": cart.id() }),
    )
    .await;

    Ok(cart)
}

/// Snapshot the cart into a checkout summary, then empty it.
pub async fn checkout(state: &AppState, user: &AuthUser) -> AppResult<CheckoutSummary> {
    let mut cart = find_or_create(state, user.user_id).await?;
    let summary = cart.checkout_summary()?;

    cart.clear();
    save(state, &cart).await?;

    tracing::info!(
        user_id = %user.user_id,
        cart_id = %summary.cart_id,
        total = %summary.total,
        "cart checked out"
    );
    audit::record(
        &state.pool,
        user.user_id,
        "checkout",
        "carts",
        serde_json::json!({ "cart_id": summary.cart_id, "total": summary.total }),
    )
    .await;

    Ok(summary)
}

async fn find_by_user(state: &AppState, user_id: Uuid) -> AppResult<Option<CartModel>> {
    let model = Carts::find()
        .filter(CartCol::UserId.eq(user_id))
        .one(&state.orm)
        .await?;
    Ok(model)
}

/// Write the whole cart document back in one update.
async fn save(state: &AppState, cart: &Cart) -> AppResult<Cart> {
    let active = CartActive {
        id: Set(cart.id()),
        user_id: Set(cart.user_id()),
        items: Set(CartLines(cart.items().to_vec())),
        subtotal: Set(cart.subtotal()),
        tax: Set(cart.tax()),
        shipping_cost: Set(cart.shipping_cost()),
        total: Set(cart.total()),
        coupon_code: Set(cart.coupon_code().map(str::to_string)),
        coupon_discount: Set(cart.coupon_discount()),
        created_at: NotSet,
        updated_at: Set(Utc::now().into()),
    };
    let model = active.update(&state.orm).await?;
    Ok(cart_from_entity(model))
}

fn cart_from_entity(model: CartModel) -> Cart {
    Cart::restore(
        model.id,
        model.user_id,
        model.items.0,
        model.shipping_cost,
        model.coupon_code,
        model.coupon_discount,
        model.created_at.with_timezone(&Utc),
        model.updated_at.with_timezone(&Utc),
    )
}
