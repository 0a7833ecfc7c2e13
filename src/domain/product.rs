use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::pricing::round_money;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Category {
    #[sea_orm(string_value = "Electronics")]
    Electronics,
    #[sea_orm(string_value = "Clothing")]
    Clothing,
    #[sea_orm(string_value = "Books")]
    Books,
    #[sea_orm(string_value = "Home")]
    Home,
    #[sea_orm(string_value = "Beauty")]
    Beauty,
    #[sea_orm(string_value = "Sports")]
    Sports,
    #[sea_orm(string_value = "Toys")]
    Toys,
    #[sea_orm(string_value = "Other")]
    Other,
}

/// Price after the percentage discount, rounded to cents.
///
/// `discount_percentage` is clamped to `0..=100` so the result never exceeds
/// `price` and never goes negative.
pub fn discounted_price(price: Decimal, discount_percentage: Decimal) -> Decimal {
    let pct = discount_percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    round_money(price * (Decimal::ONE - pct / Decimal::ONE_HUNDRED))
}

/// Collapse tags into a set, keeping first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
