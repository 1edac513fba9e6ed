//! Wire types for the placement tree lookup endpoint.

use crate::shared::{MembershipStatus, Username};
use serde::{Deserialize, Serialize};

/// REST response for `GET accounts/tree/{username}/`.
///
/// Children come back as `{ "username": ... }` stubs, never as full subtrees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeNodeResponse {
    pub username: Username,
    #[serde(default)]
    pub placement_id: Option<String>,
    #[serde(default)]
    pub status: MembershipStatus,
    #[serde(default)]
    pub left: Option<ChildRef>,
    #[serde(default)]
    pub right: Option<ChildRef>,
}

/// Reference to a child node by username.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChildRef {
    #[serde(default)]
    pub username: Option<Username>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_node() {
        let json = r#"{
            "username": "rahim",
            "placement_id": "PL1001",
            "status": "active",
            "left": { "username": "karim" },
            "right": { "username": "salma" }
        }"#;
        let node: TreeNodeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(node.username.as_str(), "rahim");
        assert_eq!(node.placement_id.as_deref(), Some("PL1001"));
        assert_eq!(node.status, MembershipStatus::Active);
        assert_eq!(
            node.left.unwrap().username,
            Some(Username::from("karim"))
        );
    }

    #[test]
    fn test_deserialize_leaf_with_nulls() {
        let json = r#"{"username": "leaf", "placement_id": "PL9", "status": "inactive", "left": null, "right": null}"#;
        let node: TreeNodeResponse = serde_json::from_str(json).unwrap();
        assert!(node.left.is_none());
        assert!(node.right.is_none());
        assert_eq!(node.status, MembershipStatus::Inactive);
    }

    #[test]
    fn test_deserialize_missing_fields_default() {
        let node: TreeNodeResponse = serde_json::from_str(r#"{"username": "bare"}"#).unwrap();
        assert!(node.placement_id.is_none());
        assert_eq!(node.status, MembershipStatus::Inactive);
        assert!(node.left.is_none());
    }
}
