use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::order::{OrderStatus, PaymentMethod},
    dto::users::AddressInput,
};

/// `Serialize` is required by the `length` rule on `CreateOrderRequest::items`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    #[validate(custom(function = "crate::dto::non_negative"))]
    pub price: Decimal,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity: i32,
    pub image: Option<String>,
}

/// Order submission. Totals are taken as supplied, not recomputed.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "must contain at least one item"), nested)]
    pub items: Vec<OrderItemInput>,
    #[validate(nested)]
    pub shipping_address: AddressInput,
    #[validate(nested)]
    pub billing_address: Option<AddressInput>,
    pub payment_method: PaymentMethod,
    #[validate(custom(function = "crate::dto::non_negative"))]
    pub subtotal: Decimal,
    #[validate(custom(function = "crate::dto::non_negative"))]
    pub shipping_cost: Decimal,
    #[validate(custom(function = "crate::dto::non_negative"))]
    pub tax: Decimal,
    #[validate(custom(function = "crate::dto::non_negative"))]
    pub total: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateTrackingRequest {
    #[validate(length(min = 1, max = 100, message = "is required"))]
    pub tracking_number: String,
    pub estimated_delivery_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn address() -> AddressInput {
        AddressInput {
            street: "1 Main St".into(),
            city: "Springfield".into(),
            state: None,
            postal_code: "12345".into(),
            country: "US".into(),
            is_default: false,
        }
    }

    fn request(items: Vec<OrderItemInput>) -> CreateOrderRequest {
        CreateOrderRequest {
            items,
            shipping_address: address(),
            billing_address: None,
            payment_method: PaymentMethod::CreditCard,
            subtotal: Decimal::new(2000, 2),
            shipping_cost: Decimal::new(599, 2),
            tax: Decimal::new(160, 2),
            total: Decimal::new(2759, 2),
        }
    }

    #[test]
    fn empty_order_is_rejected() {
        let err: AppError = request(vec![]).validate().unwrap_err().into();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "items");
    }

    #[test]
    fn nested_item_errors_carry_their_path() {
        let item = OrderItemInput {
            product_id: Uuid::new_v4(),
            name: "Lamp".into(),
            price: Decimal::new(-1, 0),
            quantity: 0,
            image: None,
        };
        let err: AppError = request(vec![item]).validate().unwrap_err().into();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        let paths: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(paths, vec!["items[0].price", "items[0].quantity"]);
    }

    #[test]
    fn well_formed_order_passes() {
        let item = OrderItemInput {
            product_id: Uuid::new_v4(),
            name: "Lamp".into(),
            price: Decimal::new(1000, 2),
            quantity: 2,
            image: None,
        };
        assert!(request(vec![item]).validate().is_ok());
    }
}
