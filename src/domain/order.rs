use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum OrderStatus {
    #[sea_orm(string_value = "Processing")]
    Processing,
    #[sea_orm(string_value = "In Transit")]
    #[serde(rename = "In Transit")]
    InTransit,
    #[sea_orm(string_value = "Delivered")]
    Delivered,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::InTransit => "In Transit",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Cancelled is reachable from every state except Delivered.
    pub fn cancel(self) -> Result<Self, OrderError> {
        if self == OrderStatus::Delivered {
            return Err(OrderError::InvalidTransition {
                from: self,
                to: OrderStatus::Cancelled,
            });
        }
        Ok(OrderStatus::Cancelled)
    }

    /// Owner-driven status change. Only cancelling a delivered order is
    /// refused; any other jump is accepted as-is.
    pub fn transition_to(self, next: OrderStatus) -> Result<Self, OrderError> {
        if next == OrderStatus::Cancelled {
            return self.cancel();
        }
        Ok(next)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "Credit Card")]
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[sea_orm(string_value = "PayPal")]
    PayPal,
    #[sea_orm(string_value = "Bank Transfer")]
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[sea_orm(string_value = "Cash on Delivery")]
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Completed")]
    Completed,
    #[sea_orm(string_value = "Failed")]
    Failed,
    #[sea_orm(string_value = "Refunded")]
    Refunded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_allowed_before_delivery() {
        assert_eq!(OrderStatus::Processing.cancel(), Ok(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::InTransit.cancel(), Ok(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::Cancelled.cancel(), Ok(OrderStatus::Cancelled));
    }

    #[test]
    fn cancel_is_refused_once_delivered() {
        assert_eq!(
            OrderStatus::Delivered.cancel(),
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Cancelled,
            })
        );
    }

    #[test]
    fn other_transitions_are_unguarded() {
        assert_eq!(
            OrderStatus::Processing.transition_to(OrderStatus::Delivered),
            Ok(OrderStatus::Delivered)
        );
        assert_eq!(
            OrderStatus::Cancelled.transition_to(OrderStatus::Processing),
            Ok(OrderStatus::Processing)
        );
        assert!(
            OrderStatus::Delivered
                .transition_to(OrderStatus::Cancelled)
                .is_err()
        );
    }

    #[test]
    fn status_serializes_with_display_names() {
        let json = serde_json::to_string(&OrderStatus::InTransit).unwrap();
        assert_eq!(json, "\"In Transit\"");
        let parsed: PaymentMethod = serde_json::from_str("\"Cash on Delivery\"").unwrap();
        assert_eq!(parsed, PaymentMethod::CashOnDelivery);
    }
}
