use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::product::Category;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "is required"))]
    pub name: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "crate::dto::non_negative"))]
    pub price: Decimal,
    pub category: Category,
    #[validate(range(min = 0, message = "must not be negative"))]
    #[serde(default)]
    pub stock_quantity: i32,
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[validate(custom(function = "crate::dto::percentage"))]
    pub discount_percentage: Option<Decimal>,
}

/// Fields a vendor may change. Ownership and rating are not updatable.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "crate::dto::non_negative"))]
    pub price: Option<Decimal>,
    pub category: Option<Category>,
    pub in_stock: Option<bool>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock_quantity: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    #[validate(custom(function = "crate::dto::percentage"))]
    pub discount_percentage: Option<Decimal>,
}
