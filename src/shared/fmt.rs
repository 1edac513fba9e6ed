//! Display formatting for taka amounts and point-value badges.

use crate::shared::MembershipStatus;
use rust_decimal::Decimal;

/// Taka sign used on every price surface.
pub const TAKA: char = '৳';

/// Format an amount as shown on catalog, detail and cart pages (`৳850`,
/// `৳99.5`). Trailing zeros are dropped; negative amounts keep their sign.
pub fn format_taka(amount: Decimal) -> String {
    format!("{}{}", TAKA, amount.normalize())
}

/// Point-value badge on a product card.
///
/// Active members see the discount they get (`৳150 OFF`), everyone else the
/// points they would earn (`+150 PV`).
pub fn pv_badge(status: MembershipStatus, point_value: Decimal) -> String {
    let pv = point_value.normalize();
    if status.is_active() {
        format!("{}{} OFF", TAKA, pv)
    } else {
        format!("+{} PV", pv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_taka_drops_trailing_zeros() {
        assert_eq!(format_taka(Decimal::from_str("850.00").unwrap()), "৳850");
        assert_eq!(format_taka(Decimal::from_str("99.50").unwrap()), "৳99.5");
    }

    #[test]
    fn test_format_taka_negative() {
        assert_eq!(format_taka(Decimal::from(-50)), "৳-50");
    }

    #[test]
    fn test_pv_badge() {
        let pv = Decimal::from_str("150.00").unwrap();
        assert_eq!(pv_badge(MembershipStatus::Active, pv), "৳150 OFF");
        assert_eq!(pv_badge(MembershipStatus::Inactive, pv), "+150 PV");
    }
}
