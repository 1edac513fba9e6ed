//! Checkout totals and order-line payloads derived from the cart.
//!
//! Submitting the order is left to the caller; this only computes what the
//! checkout page shows and what the order request carries.

use super::{CartLine, CartStorage, CartStore};
use crate::shared::serde_util::decimal_lenient;
use crate::shared::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shipping inside Dhaka.
pub const SHIPPING_INSIDE_DHAKA: i64 = 100;
/// Shipping everywhere else.
pub const SHIPPING_OUTSIDE_DHAKA: i64 = 130;

/// Flat shipping fee for a delivery city.
pub fn shipping_fee(city: &str) -> Decimal {
    if city.trim().eq_ignore_ascii_case("dhaka") {
        Decimal::from(SHIPPING_INSIDE_DHAKA)
    } else {
        Decimal::from(SHIPPING_OUTSIDE_DHAKA)
    }
}

/// One line of an order request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    #[serde(with = "decimal_lenient")]
    pub price: Decimal,
    #[serde(with = "decimal_lenient")]
    pub point_value: Decimal,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        OrderItem {
            product_id: line.product_id,
            product_name: line.name.clone(),
            quantity: line.quantity,
            price: line.unit_price,
            point_value: line.reward_points,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub reward_points: Decimal,
    pub item_count: u64,
    items: Vec<OrderItem>,
}

impl CheckoutSummary {
    pub fn new<S: CartStorage>(cart: &CartStore<S>, city: &str) -> Self {
        Self::from_lines(cart.lines(), city)
    }

    pub fn from_lines(lines: &[CartLine], city: &str) -> Self {
        let subtotal: Decimal = lines.iter().map(CartLine::line_total).sum();
        let shipping = shipping_fee(city);
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
            reward_points: lines.iter().map(CartLine::line_points).sum(),
            item_count: lines.iter().map(|l| u64::from(l.quantity)).sum(),
            items: lines.iter().map(OrderItem::from).collect(),
        }
    }

    pub fn order_items(&self) -> &[OrderItem] {
        &self.items
    }
}
