use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use thiserror::Error;

use super::pricing::percent_of;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponError {
    #[error("Invalid coupon code: {0}")]
    Unknown(String),
}

/// The fixed set of coupon codes the shop recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coupon {
    /// 10% off the subtotal at the moment of application.
    Welcome10,
    /// Waives the shipping cost charged at the moment of application.
    FreeShip,
}

impl Coupon {
    pub fn code(self) -> &'static str {
        match self {
            Coupon::Welcome10 => "WELCOME10",
            Coupon::FreeShip => "FREESHIP",
        }
    }

    /// Discount granted against the cart's current figures. The result is
    /// frozen into the cart; later item changes do not re-evaluate it.
    pub fn discount(self, subtotal: Decimal, shipping_cost: Decimal) -> Decimal {
        match self {
            Coupon::Welcome10 => percent_of(subtotal, Decimal::TEN),
            Coupon::FreeShip => shipping_cost,
        }
    }
}

impl FromStr for Coupon {
    type Err = CouponError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code.trim().to_ascii_uppercase().as_str() {
            "WELCOME10" => Ok(Coupon::Welcome10),
            "FREESHIP" => Ok(Coupon::FreeShip),
            _ => Err(CouponError::Unknown(code.trim().to_string())),
        }
    }
}

impl fmt::Display for Coupon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn parses_known_codes_case_insensitively() {
        assert_eq!("WELCOME10".parse::<Coupon>(), Ok(Coupon::Welcome10));
        assert_eq!(" freeship ".parse::<Coupon>(), Ok(Coupon::FreeShip));
    }

    #[test]
    fn rejects_unknown_codes() {
        assert_eq!(
            "HALFOFF".parse::<Coupon>(),
            Err(CouponError::Unknown("HALFOFF".into()))
        );
        assert!("".parse::<Coupon>().is_err());
    }

    #[test]
    fn welcome10_is_ten_percent_of_subtotal() {
        assert_eq!(Coupon::Welcome10.discount(d("100.00"), d("0")), d("10.00"));
        assert_eq!(Coupon::Welcome10.discount(d("19.99"), d("5.99")), d("2.00"));
    }

    #[test]
    fn freeship_matches_current_shipping() {
        assert_eq!(Coupon::FreeShip.discount(d("20.00"), d("5.99")), d("5.99"));
        assert_eq!(Coupon::FreeShip.discount(d("60.00"), d("0")), d("0"));
    }
}
