//! Network domain — binary placement tree lookup, assembly, metrics and rendering.
//!
//! A member's downline is fetched one node at a time (`GET accounts/tree/{username}/`
//! returns a node plus the usernames of its two children). [`TreeAssembler`] expands
//! those references into a [`NetworkTree`], an arena of nodes linked by [`NodeId`].

pub mod assembler;
#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod fetcher;
pub mod metrics;
pub mod render;
pub mod view;
pub mod wire;

pub use assembler::{AssemblerConfig, AssemblyToken, TreeAssembler};
pub use fetcher::NetworkFetcher;
pub use metrics::{count_nodes, depth_estimate, TreeMetrics};
pub use render::{HoverState, RenderScene, Zoom};
pub use view::{LoadOutcome, TreeView};

use crate::shared::{MembershipStatus, Username};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Index of a node inside a [`NetworkTree`].
pub type NodeId = usize;

/// Which downstream slot a child occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── Member ──────────────────────────────────────────────────────────────────

/// Attributes of one member in the placement network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub username: Username,
    /// Stable position identifier, distinct from the login name.
    pub placement_code: String,
    pub status: MembershipStatus,
}

/// Result of a single-node lookup: the member plus references to its children.
///
/// Children are referenced by username only; expanding them is the
/// assembler's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub member: Member,
    pub left: Option<Username>,
    pub right: Option<Username>,
}

impl MemberRecord {
    pub fn child(&self, side: Side) -> Option<&Username> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

// ─── Tree ────────────────────────────────────────────────────────────────────

/// A node of an assembled tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub member: Member,
    /// `None` for the root.
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    /// Distance from the root (root = 0).
    pub level: usize,
}

impl TreeNode {
    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn has_children(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }
}

/// Why a referenced child is missing from the assembled tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TruncationReason {
    /// The lookup failed; the branch is rendered as an absent slot.
    FetchFailed(String),
    /// The child sits below the configured depth limit and was never fetched.
    DepthLimit,
}

/// A child reference that did not make it into the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    pub parent: NodeId,
    pub side: Side,
    pub username: Username,
    pub reason: TruncationReason,
}

/// An assembled binary placement tree.
///
/// Nodes live in a flat arena; the root is always index 0. At most two
/// children per node, and every non-root node has exactly one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTree {
    nodes: Vec<TreeNode>,
    truncations: Vec<Truncation>,
}

impl NetworkTree {
    /// Start a tree from its root member.
    pub fn with_root(member: Member) -> Self {
        Self {
            nodes: vec![TreeNode {
                member,
                parent: None,
                left: None,
                right: None,
                level: 0,
            }],
            truncations: Vec::new(),
        }
    }

    /// Attach `member` below `parent` on `side`, returning the new node's id.
    ///
    /// Returns `None` if `parent` does not exist or the slot is already taken.
    pub fn attach(&mut self, parent: NodeId, side: Side, member: Member) -> Option<NodeId> {
        let level = {
            let p = self.nodes.get(parent)?;
            if p.child(side).is_some() {
                return None;
            }
            p.level + 1
        };
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            member,
            parent: Some(parent),
            left: None,
            right: None,
            level,
        });
        let p = &mut self.nodes[parent];
        match side {
            Side::Left => p.left = Some(id),
            Side::Right => p.right = Some(id),
        }
        Some(id)
    }

    pub(crate) fn record_truncation(&mut self, truncation: Truncation) {
        self.truncations.push(truncation);
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn root_member(&self) -> &Member {
        &self.nodes[0].member
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree exists only once its root resolved.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child references that could not be expanded.
    pub fn truncations(&self) -> &[Truncation] {
        &self.truncations
    }

    /// Find a node by username.
    pub fn find(&self, username: &Username) -> Option<NodeId> {
        self.nodes.iter().position(|n| &n.member.username == username)
    }

    /// Node ids in breadth-first order starting at `from`.
    pub fn breadth_first(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        if from < self.nodes.len() {
            queue.push_back(from);
        }
        while let Some(id) = queue.pop_front() {
            order.push(id);
            let node = &self.nodes[id];
            queue.extend(node.left);
            queue.extend(node.right);
        }
        order
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_attach_links_parent_and_level() {
        let tree = small_tree();
        assert_eq!(tree.len(), 4);
        let c = tree.find(&Username::from("c")).unwrap();
        let node = tree.node(c).unwrap();
        assert_eq!(node.level, 2);
        let parent = tree.node(node.parent.unwrap()).unwrap();
        assert_eq!(parent.member.username.as_str(), "a");
        assert_eq!(parent.left, Some(c));
        assert_eq!(parent.right, None);
    }

    #[test]
    fn test_attach_rejects_taken_slot() {
        let mut tree = small_tree();
        assert!(tree
            .attach(0, Side::Left, member("dup", MembershipStatus::Active))
            .is_none());
        assert!(tree
            .attach(99, Side::Left, member("orphan", MembershipStatus::Active))
            .is_none());
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_root_has_no_parent() {
        let tree = small_tree();
        assert!(tree.node(tree.root()).unwrap().parent.is_none());
        assert_eq!(tree.root_member().username.as_str(), "root");
    }

    #[test]
    fn test_breadth_first_order() {
        let tree = small_tree();
        let names: Vec<_> = tree
            .breadth_first(tree.root())
            .into_iter()
            .map(|id| tree.node(id).unwrap().member.username.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["root", "a", "b", "c"]);
    }
}
