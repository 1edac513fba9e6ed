//! Wire types for the account endpoints.

use crate::shared::serde_util::decimal_lenient;
use crate::shared::{MembershipStatus, Username};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Role;

/// Response from `GET accounts/profile/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileResponse {
    pub username: Username,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub reff_id: Option<String>,
    #[serde(default)]
    pub placement_id: Option<String>,
    #[serde(default)]
    pub status: MembershipStatus,
    #[serde(default)]
    pub role: Role,
    #[serde(with = "decimal_lenient", default)]
    pub balance: Decimal,
    #[serde(with = "decimal_lenient", default)]
    pub points: Decimal,
    #[serde(default)]
    pub left_count: u64,
    #[serde(default)]
    pub right_count: u64,
    #[serde(default)]
    pub star_level: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}
