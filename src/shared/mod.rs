//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the backend sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod fmt;
pub mod serde_util;

pub use fmt::{format_taka, pv_badge};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── Username ────────────────────────────────────────────────────────────────

/// Newtype for member login names — the unique key of a network node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank names never resolve to a member and are rejected before any lookup.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Short label drawn inside a tree marker (first four characters).
    pub fn short_label(&self) -> &str {
        match self.0.char_indices().nth(4) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for Username {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Username(s.to_string()))
    }
}

impl Serialize for Username {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Username(s))
    }
}

// ─── ProductId ───────────────────────────────────────────────────────────────

/// Catalog product identifier (numeric primary key on the backend).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl ProductId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ─── MembershipStatus ────────────────────────────────────────────────────────

/// Membership tier of a member.
///
/// Only `active` members get the immediate point-value discount; every other
/// status accrues reward points instead. Unknown backend values deserialize as
/// `Inactive`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    #[default]
    #[serde(other)]
    Inactive,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Label shown in tree tooltips.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "✓ Active",
            Self::Inactive => "✗ Inactive",
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_serde() {
        let name = Username::from("alice");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"alice\"");
        let back: Username = serde_json::from_str(&json).unwrap();
        assert_eq!(name, back);
    }

    #[test]
    fn test_username_short_label() {
        assert_eq!(Username::from("rahimuddin").short_label(), "rahi");
        assert_eq!(Username::from("bo").short_label(), "bo");
        assert_eq!(Username::from("সাকিবহাসান").short_label(), "সাকি");
    }

    #[test]
    fn test_username_blank() {
        assert!(Username::from("   ").is_blank());
        assert!(Username::from("").is_blank());
        assert!(!Username::from("x").is_blank());
    }

    #[test]
    fn test_product_id_transparent() {
        let id: ProductId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ProductId(42));
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn test_membership_status_serde() {
        let active: MembershipStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(active, MembershipStatus::Active);
        let inactive: MembershipStatus = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(inactive, MembershipStatus::Inactive);
        let unknown: MembershipStatus = serde_json::from_str("\"suspended\"").unwrap();
        assert_eq!(unknown, MembershipStatus::Inactive);
    }
}
