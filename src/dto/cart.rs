use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 10000, message = "must be between 1 and 10000"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateCartItemRequest {
    /// 0 removes the line.
    #[validate(range(min = 0, max = 10000, message = "must be between 0 and 10000"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ApplyCouponRequest {
    #[validate(length(min = 1, max = 32, message = "is required"))]
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::MAX_LINE_QUANTITY;

    #[test]
    fn quantity_bounds_match_cart_line_cap() {
        let add = |quantity| AddToCartRequest {
            product_id: Uuid::new_v4(),
            quantity,
        };
        assert!(add(0).validate().is_err());
        assert!(add(MAX_LINE_QUANTITY).validate().is_ok());
        assert!(add(MAX_LINE_QUANTITY + 1).validate().is_err());
        assert!(add(i32::MAX).validate().is_err());

        assert!(UpdateCartItemRequest { quantity: 0 }.validate().is_ok());
        assert!(UpdateCartItemRequest { quantity: -1 }.validate().is_err());
        assert!(
            UpdateCartItemRequest {
                quantity: MAX_LINE_QUANTITY + 1
            }
            .validate()
            .is_err()
        );
    }
}
