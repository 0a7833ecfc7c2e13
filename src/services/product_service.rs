use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::product::normalize_tags,
    dto::products::{CreateProductRequest, UpdateProductRequest},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_role},
    models::{Product, UserRole},
    response::{MessageResponse, Meta, Paginated},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
};

pub async fn list_products(state: &AppState, query: ProductQuery) -> AppResult<Paginated<Product>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }
    if let Some(category) = query.category {
        condition = condition.add(Column::Category.eq(category));
    }
    if let Some(vendor_id) = query.vendor_id {
        condition = condition.add(Column::VendorId.eq(vendor_id));
    }
    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }
    if let Some(in_stock) = query.in_stock {
        condition = condition.add(Column::InStock.eq(in_stock));
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
        ProductSortBy::Rating => Column::Rating,
    };

    let mut finder = Products::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(Paginated::new(items, Meta::new(page, limit, total)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    Ok(Product::from(load(state, id).await?))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<Product> {
    ensure_role(user, &[UserRole::Vendor, UserRole::Admin])?;
    payload.validate()?;

    let now = Utc::now();
    let in_stock = payload.in_stock.unwrap_or(payload.stock_quantity > 0);
    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        price: Set(payload.price),
        category: Set(payload.category),
        in_stock: Set(in_stock),
        stock_quantity: Set(payload.stock_quantity),
        tags: Set(normalize_tags(payload.tags)),
        images: Set(payload.images),
        vendor_id: Set(user.user_id),
        rating: Set(Decimal::ZERO),
        discount_percentage: Set(payload.discount_percentage.unwrap_or(Decimal::ZERO)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(vendor_id = %user.user_id, product_id = %product.id, "product created");
    audit::record(
        &state.pool,
        user.user_id,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(Product::from(product))
}

/// Apply an allow-listed set of changes. `vendor_id` and `rating` are never
/// taken from the request.
pub fn apply_update(active: &mut ActiveModel, payload: UpdateProductRequest) {
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(in_stock) = payload.in_stock {
        active.in_stock = Set(in_stock);
    }
    if let Some(stock_quantity) = payload.stock_quantity {
        active.stock_quantity = Set(stock_quantity);
    }
    if let Some(tags) = payload.tags {
        active.tags = Set(normalize_tags(tags));
    }
    if let Some(images) = payload.images {
        active.images = Set(images);
    }
    if let Some(discount_percentage) = payload.discount_percentage {
        active.discount_percentage = Set(discount_percentage);
    }
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    payload.validate()?;
    let existing = load(state, id).await?;
    if !user.owns_or_admin(existing.vendor_id) {
        return Err(AppError::forbidden());
    }

    let mut active: ActiveModel = existing.into();
    apply_update(&mut active, payload);
    active.updated_at = Set(Utc::now().into());
    let product = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(Product::from(product))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<MessageResponse> {
    let existing = load(state, id).await?;
    if !user.owns_or_admin(existing.vendor_id) {
        return Err(AppError::forbidden());
    }

    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Product"));
    }

    audit::record(
        &state.pool,
        user.user_id,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(MessageResponse::new("Product deleted"))
}

async fn load(state: &AppState, id: Uuid) -> AppResult<ProductModel> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::Category;
    use sea_orm::ActiveValue;

    fn model() -> ProductModel {
        let now = Utc::now().into();
        ProductModel {
            id: Uuid::new_v4(),
            name: "Desk Lamp".into(),
            description: "Warm light".into(),
            price: Decimal::new(2500, 2),
            category: Category::Home,
            in_stock: true,
            stock_quantity: 4,
            tags: vec!["lighting".into()],
            images: vec![],
            vendor_id: Uuid::new_v4(),
            rating: Decimal::new(45, 1),
            discount_percentage: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn update_touches_only_supplied_fields() {
        let original = model();
        let mut active: ActiveModel = original.clone().into();
        apply_update(
            &mut active,
            UpdateProductRequest {
                price: Some(Decimal::new(1999, 2)),
                tags: Some(vec!["lighting".into(), "lighting".into(), "desk".into()]),
                ..Default::default()
            },
        );

        assert_eq!(active.price, ActiveValue::Set(Decimal::new(1999, 2)));
        assert_eq!(
            active.tags,
            ActiveValue::Set(vec!["lighting".to_string(), "desk".to_string()])
        );
        assert_eq!(active.name, ActiveValue::Unchanged(original.name));
        assert_eq!(active.vendor_id, ActiveValue::Unchanged(original.vendor_id));
        assert_eq!(active.rating, ActiveValue::Unchanged(original.rating));
    }
}
