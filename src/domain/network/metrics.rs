//! Tree metrics — member count and approximate depth.

use super::{NetworkTree, NodeId};

/// Summary figures shown next to a rendered tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeMetrics {
    pub member_count: usize,
    /// Balanced-tree approximation, see [`depth_estimate`].
    pub depth_estimate: u32,
}

impl TreeMetrics {
    pub fn of(tree: &NetworkTree) -> Self {
        let member_count = count_nodes(tree, Some(tree.root()));
        Self {
            member_count,
            depth_estimate: depth_estimate(member_count),
        }
    }
}

/// Members in the subtree at `node`: `1 + count(left) + count(right)`, with an
/// absent node counting as 0.
///
/// Walks with an explicit stack so arbitrarily deep trees cannot overflow.
pub fn count_nodes(tree: &NetworkTree, node: Option<NodeId>) -> usize {
    let mut count = 0;
    let mut stack: Vec<NodeId> = node.into_iter().collect();
    while let Some(id) = stack.pop() {
        let Some(n) = tree.node(id) else {
            continue;
        };
        count += 1;
        stack.extend(n.left);
        stack.extend(n.right);
    }
    count
}

/// `ceil(log2(count + 1))`, the number of levels a perfectly balanced binary
/// tree with `count` members would have. Skewed trees are deeper than this.
pub fn depth_estimate(count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    // ceil(log2(n + 1)) == bit length of n for n >= 1
    usize::BITS - count.leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::network::test_support::{member, small_tree};
    use crate::domain::network::Side;
    use crate::shared::MembershipStatus;

    fn assert_recursive_identity(tree: &NetworkTree, id: NodeId) {
        let node = tree.node(id).unwrap();
        assert_eq!(
            count_nodes(tree, Some(id)),
            1 + count_nodes(tree, node.left) + count_nodes(tree, node.right)
        );
        for child in [node.left, node.right].into_iter().flatten() {
            assert_recursive_identity(tree, child);
        }
    }

    #[test]
    fn test_count_identity_holds_at_every_level() {
        let tree = small_tree();
        assert_recursive_identity(&tree, tree.root());
        assert_eq!(count_nodes(&tree, Some(tree.root())), 4);
    }

    #[test]
    fn test_absent_node_counts_zero() {
        let tree = small_tree();
        assert_eq!(count_nodes(&tree, None), 0);
    }

    #[test]
    fn test_depth_estimate_values() {
        assert_eq!(depth_estimate(0), 0);
        assert_eq!(depth_estimate(1), 1);
        assert_eq!(depth_estimate(2), 2);
        assert_eq!(depth_estimate(3), 2);
        assert_eq!(depth_estimate(4), 3);
        assert_eq!(depth_estimate(7), 3);
        assert_eq!(depth_estimate(8), 4);
        assert_eq!(depth_estimate(1023), 10);
    }

    #[test]
    fn test_depth_estimate_undercounts_skewed_tree() {
        // A chain of five members is five levels deep; the estimate says three.
        let mut tree = NetworkTree::with_root(member("n0", MembershipStatus::Active));
        let mut parent = tree.root();
        for i in 1..5 {
            parent = tree
                .attach(parent, Side::Left, member(&format!("n{i}"), MembershipStatus::Active))
                .unwrap();
        }
        let metrics = TreeMetrics::of(&tree);
        assert_eq!(metrics.member_count, 5);
        assert_eq!(metrics.depth_estimate, 3);
        assert_eq!(tree.node(parent).unwrap().level + 1, 5);
    }
}
