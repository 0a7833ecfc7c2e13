//! The cart aggregate.
//!
//! A cart owns its line items and the totals derived from them. Every
//! mutation goes through a method here and ends with [`Cart::calculate_totals`],
//! so the persisted figures are never stale.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    coupon::Coupon,
    pricing::{round_money, shipping_for, tax_for},
};
use crate::models::Product;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Item not found in cart")]
    ItemNotFound(Uuid),
    #[error("Quantity must be greater than 0")]
    InvalidQuantity(i32),
    #[error("Quantity cannot exceed {max} per item", max = MAX_LINE_QUANTITY)]
    QuantityTooLarge(i64),
    #[error("Cart is empty")]
    Empty,
}

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: i32 = 10_000;

/// A priced snapshot of one product held in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub discounted_price: Decimal,
    pub image: Option<String>,
    pub quantity: i32,
}

impl CartItem {
    fn snapshot(product: &Product, quantity: i32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            discounted_price: product.discounted_price,
            image: product.images.first().cloned(),
            quantity,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.discounted_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Cart {
    id: Uuid,
    user_id: Uuid,
    items: Vec<CartItem>,
    subtotal: Decimal,
    tax: Decimal,
    shipping_cost: Decimal,
    total: Decimal,
    coupon_code: Option<String>,
    coupon_discount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// What the caller bought when the cart was checked out.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutSummary {
    pub cart_id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping_cost: Decimal,
    pub coupon_code: Option<String>,
    pub coupon_discount: Decimal,
    pub total: Decimal,
    pub checked_out_at: DateTime<Utc>,
}

impl Cart {
    /// A fresh cart: no items, zeroed totals, no coupon.
    pub fn new(id: Uuid, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            shipping_cost: Decimal::ZERO,
            total: Decimal::ZERO,
            coupon_code: None,
            coupon_discount: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a stored cart. Totals are derived again from the items and
    /// coupon rather than trusted from storage.
    ///
    /// An empty cart keeps its stored `shipping_cost`: zero when it was just
    /// created or cleared, the flat fee when its last line was removed.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        user_id: Uuid,
        items: Vec<CartItem>,
        shipping_cost: Decimal,
        coupon_code: Option<String>,
        coupon_discount: Decimal,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let mut cart = Self {
            id,
            user_id,
            items,
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            shipping_cost: Decimal::ZERO,
            total: Decimal::ZERO,
            coupon_code,
            coupon_discount,
            created_at,
            updated_at,
        };
        if cart.items.is_empty() {
            cart.set_totals(Decimal::ZERO, shipping_cost);
        } else {
            cart.calculate_totals();
        }
        cart
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item(&self, product_id: Uuid) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn tax(&self) -> Decimal {
        self.tax
    }

    pub fn shipping_cost(&self) -> Decimal {
        self.shipping_cost
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon_code.as_deref()
    }

    pub fn coupon_discount(&self) -> Decimal {
        self.coupon_discount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Add `quantity` units of `product`. An existing line keeps the price it
    /// was first captured at; only its quantity grows.
    pub fn add_item(&mut self, product: &Product, quantity: i32) -> Result<(), CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id)
        {
            Some(item) => item.quantity = checked_line_quantity(item.quantity, quantity)?,
            None => {
                let quantity = checked_line_quantity(0, quantity)?;
                self.items.push(CartItem::snapshot(product, quantity));
            }
        }
        self.touch();
        Ok(())
    }

    /// Set the quantity of an existing line. Zero or less removes the line.
    pub fn update_item_quantity(
        &mut self,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), CartError> {
        let idx = self.position(product_id)?;
        if quantity > MAX_LINE_QUANTITY {
            return Err(CartError::QuantityTooLarge(i64::from(quantity)));
        }
        if quantity <= 0 {
            self.items.remove(idx);
        } else if let Some(item) = self.items.get_mut(idx) {
            item.quantity = quantity;
        }
        self.touch();
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: Uuid) -> Result<(), CartError> {
        let idx = self.position(product_id)?;
        self.items.remove(idx);
        self.touch();
        Ok(())
    }

    /// Empty the cart and reset every figure, coupon included.
    pub fn clear(&mut self) {
        self.items.clear();
        self.subtotal = Decimal::ZERO;
        self.tax = Decimal::ZERO;
        self.shipping_cost = Decimal::ZERO;
        self.total = Decimal::ZERO;
        self.coupon_code = None;
        self.coupon_discount = Decimal::ZERO;
        self.updated_at = Utc::now();
    }

    /// Freeze the coupon's discount against the current subtotal and shipping.
    pub fn apply_coupon(&mut self, coupon: Coupon) {
        self.coupon_discount = coupon.discount(self.subtotal, self.shipping_cost);
        self.coupon_code = Some(coupon.code().to_string());
        self.touch();
    }

    pub fn remove_coupon(&mut self) {
        self.coupon_discount = Decimal::ZERO;
        self.coupon_code = None;
        self.touch();
    }

    /// Recompute every derived figure from the items, rounding each one to
    /// cents on its own.
    pub fn calculate_totals(&mut self) {
        let raw_subtotal: Decimal = self.items.iter().map(CartItem::line_total).sum();
        let subtotal = round_money(raw_subtotal);
        self.set_totals(subtotal, shipping_for(subtotal));
    }

    // The total is floored at zero: a discount frozen against an earlier,
    // larger cart may exceed what is left to pay.
    fn set_totals(&mut self, subtotal: Decimal, shipping_cost: Decimal) {
        self.subtotal = subtotal;
        self.shipping_cost = shipping_cost;
        self.tax = tax_for(subtotal);
        let total = round_money(self.subtotal + self.tax + self.shipping_cost - self.coupon_discount);
        self.total = total.max(Decimal::ZERO);
    }

    /// Snapshot the cart for checkout. Fails on an empty cart.
    pub fn checkout_summary(&self) -> Result<CheckoutSummary, CartError> {
        if self.items.is_empty() {
            return Err(CartError::Empty);
        }
        Ok(CheckoutSummary {
            cart_id: self.id,
            user_id: self.user_id,
            items: self.items.clone(),
            subtotal: self.subtotal,
            tax: self.tax,
            shipping_cost: self.shipping_cost,
            coupon_code: self.coupon_code.clone(),
            coupon_discount: self.coupon_discount,
            total: self.total,
            checked_out_at: Utc::now(),
        })
    }

    fn position(&self, product_id: Uuid) -> Result<usize, CartError> {
        self.items
            .iter()
            .position(|item| item.product_id == product_id)
            .ok_or(CartError::ItemNotFound(product_id))
    }

    fn touch(&mut self) {
        self.calculate_totals();
        self.updated_at = Utc::now();
    }
}

fn checked_line_quantity(current: i32, added: i32) -> Result<i32, CartError> {
    let wanted = i64::from(current) + i64::from(added);
    if wanted > i64::from(MAX_LINE_QUANTITY) {
        return Err(CartError::QuantityTooLarge(wanted));
    }
    i32::try_from(wanted).map_err(|_| CartError::QuantityTooLarge(wanted))
}
