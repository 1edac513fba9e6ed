//! Pricing domain — membership-tier price and reward-point computation.
//!
//! One rule applies on every surface that shows or sells a product (catalog
//! cards, product detail, cart):
//!
//! | status     | display price            | reward points | discount flag      |
//! |------------|--------------------------|---------------|--------------------|
//! | `active`   | `base_price − point_value` | `0`         | `point_value > 0`  |
//! | otherwise  | `base_price`             | `point_value` | `false`            |
//!
//! The display price is not floored at zero: a point value larger than the
//! base price yields a negative price.

use crate::domain::catalog::Product;
use crate::shared::{pv_badge, MembershipStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price shown to one member for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub display_price: Decimal,
    pub reward_points: Decimal,
    pub discount_applied: bool,
}

/// Apply the membership pricing rule. Pure and deterministic.
pub fn compute_pricing(
    base_price: Decimal,
    point_value: Decimal,
    status: MembershipStatus,
) -> PricingResult {
    match status {
        MembershipStatus::Active => PricingResult {
            display_price: base_price - point_value,
            reward_points: Decimal::ZERO,
            discount_applied: point_value > Decimal::ZERO,
        },
        MembershipStatus::Inactive => PricingResult {
            display_price: base_price,
            reward_points: point_value,
            discount_applied: false,
        },
    }
}

/// The viewer's membership tier, passed explicitly to every pricing surface.
///
/// Built from the session profile (see [`Auth::pricing_context`](crate::auth::client::Auth::pricing_context))
/// or directly for anonymous visitors, who price as `inactive`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PricingContext {
    status: MembershipStatus,
}

impl PricingContext {
    pub fn new(status: MembershipStatus) -> Self {
        Self { status }
    }

    /// Context for a visitor without a session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn status(&self) -> MembershipStatus {
        self.status
    }

    pub fn price(&self, product: &Product) -> PricingResult {
        compute_pricing(product.base_price, product.point_value, self.status)
    }

    /// `৳150 OFF` for active members, `+150 PV` otherwise.
    pub fn badge(&self, product: &Product) -> String {
        pv_badge(self.status, product.point_value)
    }
}
