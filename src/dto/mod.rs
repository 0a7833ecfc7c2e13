pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod users;

use rust_decimal::Decimal;
use validator::ValidationError;

pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("percentage");
        err.message = Some("must be between 0 and 100".into());
        return Err(err);
    }
    Ok(())
}
