//! Business rules that do not touch the store.

pub mod cart;
pub mod coupon;
pub mod order;
pub mod pricing;
pub mod product;
