use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::order::{OrderStatus, PaymentStatus},
    dto::orders::{CreateOrderRequest, UpdateOrderStatusRequest, UpdateTrackingRequest},
    entity::orders::{
        ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        OrderLines,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem},
    response::{Meta, Paginated},
    routes::params::{OrderListQuery, SortOrder},
    services::user_service::address_from_input,
    state::AppState,
};

/// Record an order from client-supplied lines and totals. Nothing is read
/// from the cart or the catalog; the lines are stored as submitted.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<Order> {
    payload.validate()?;

    let items: Vec<OrderItem> = payload
        .items
        .into_iter()
        .map(|item| OrderItem {
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
            image: item.image,
        })
        .collect();

    let now = Utc::now();
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        items: Set(OrderLines(items)),
        shipping_address: Set(address_from_input(payload.shipping_address)),
        billing_address: Set(payload.billing_address.map(address_from_input)),
        status: Set(OrderStatus::Processing),
        payment_method: Set(payload.payment_method),
        payment_status: Set(PaymentStatus::Pending),
        subtotal: Set(payload.subtotal),
        shipping_cost: Set(payload.shipping_cost),
        tax: Set(payload.tax),
        total: Set(payload.total),
        tracking_number: Set(None),
        estimated_delivery_date: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(user_id = %user.user_id, order_id = %order.id, total = %order.total, "order created");
    audit::record(
        &state.pool,
        user.user_id,
        "order_create",
        "orders",
        serde_json::json!({ "order_id": order.id, "total": order.total }),
    )
    .await;

    Ok(Order::from(order))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<Paginated<Order>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(Paginated::new(orders, Meta::new(page, limit, total)))
}

pub async fn get_order(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<Order> {
    let order = load_owned(state, user, id).await?;
    Ok(Order::from(order))
}

/// Owner-driven status change. Only cancelling a delivered order is refused.
pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<Order> {
    let existing = load_owned(state, user, id).await?;
    let from = existing.status;
    let next = from.transition_to(payload.status)?;

    let order = set_status(state, existing, next).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "from": from.as_str(), "to": next.as_str() }),
    )
    .await;

    Ok(Order::from(order))
}

pub async fn cancel_order(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<Order> {
    let existing = load_owned(state, user, id).await?;
    let next = existing.status.cancel()?;

    let order = set_status(state, existing, next).await?;

    tracing::info!(user_id = %user.user_id, order_id = %order.id, "order cancelled");
    audit::record(
        &state.pool,
        user.user_id,
        "order_cancel",
        "orders",
        serde_json::json!({ "order_id": order.id }),
    )
    .await;

    Ok(Order::from(order))
}

pub async fn update_tracking(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateTrackingRequest,
) -> AppResult<Order> {
    payload.validate()?;
    let existing = load_owned(state, user, id).await?;

    let mut active: OrderActive = existing.into();
    active.tracking_number = Set(Some(payload.tracking_number));
    active.estimated_delivery_date = Set(payload.estimated_delivery_date.map(Into::into));
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "order_tracking_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "tracking_number": order.tracking_number }),
    )
    .await;

    Ok(Order::from(order))
}

/// 404 when the order does not exist, 403 when it belongs to someone else.
async fn load_owned(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<OrderModel> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;

    if order.user_id != user.user_id {
        return Err(AppError::forbidden());
    }
    Ok(order)
}

async fn set_status(
    state: &AppState,
    existing: OrderModel,
    status: OrderStatus,
) -> AppResult<OrderModel> {
    let mut active: OrderActive = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(&state.orm).await?)
}
