//! The tree capabilities split encoding relies on.
//!
//! Split extraction never touches a concrete tree type. It walks any
//! [`SplitTopology`]: a post-order over nodes with stable indices, a
//! left/right child pair per internal node, and for every node whether the
//! far end of the edge above it (its *partner*) is an internal node.
//!
//! # Adapting `phylotree`
//! `phylotree` stores a tree as a rooted arena. An unrooted tree is either
//! written with a 3-way virtual root or with a 2-way root:
//!
//! ```text
//!   3-way root (A,B,(C,(D,E)));      2-way root (A,(B,(C,(D,E))));
//!
//!        root                              root
//!      /  |   \                           /    \
//!     A   B    x                         A      x
//!             / \                              / \
//!            C   y                            B   y
//!               / \                              / \
//!              D   E                            C   z
//!                                                  / \
//!                                                 D   E
//! ```
//!
//! - 3-way root: its first two children are left/right, the third is its
//!   partner, as if the traversal entered the root from that third edge.
//! - 2-way root: it is not a real node of the unrooted tree. The edge
//!   `x - root - A` is the single edge `x - A`, so the partner of a root child
//!   is its sibling, and the root itself has no partner.
//! - Any other internal node must have exactly two children.

use crate::error::{DistanceError, Result};
use phylotree::tree::Tree as PhyloTree;

/// Stable index of a node, valid for indexing `0..node_count()`.
pub type NodeIndex = usize;

/// Read-only view of an unrooted, binary resolved tree.
pub trait SplitTopology {
    /// Size of an arena covering every node index.
    fn node_count(&self) -> usize;

    fn leaf_count(&self) -> usize;

    /// Leaf nodes in a fixed order. Species ids are handed out in this order.
    fn leaves(&self) -> Vec<NodeIndex>;

    fn leaf_label(&self, node: NodeIndex) -> Result<&str>;

    /// Every node, children before parents.
    fn post_order(&self) -> Result<Vec<NodeIndex>>;

    /// `None` for a leaf, the left/right pair for an internal node.
    fn children(&self, node: NodeIndex) -> Result<Option<(NodeIndex, NodeIndex)>>;

    /// Whether the other endpoint of the edge above `node` is internal.
    /// `false` when there is no such edge.
    fn partner_is_internal(&self, node: NodeIndex) -> Result<bool>;
}

impl SplitTopology for PhyloTree {
    fn node_count(&self) -> usize {
        self.size()
    }

    fn leaf_count(&self) -> usize {
        self.n_leaves()
    }

    fn leaves(&self) -> Vec<NodeIndex> {
        self.get_leaves()
    }

    fn leaf_label(&self, node: NodeIndex) -> Result<&str> {
        self.get(&node)?
            .name
            .as_deref()
            .ok_or(DistanceError::UnnamedLeaf(node))
    }

    fn post_order(&self) -> Result<Vec<NodeIndex>> {
        let root = self.get_root()?;
        Ok(self.postorder(&root)?)
    }

    fn children(&self, node: NodeIndex) -> Result<Option<(NodeIndex, NodeIndex)>> {
        let n = self.get(&node)?;
        match (n.children.as_slice(), n.parent) {
            ([], _) => Ok(None),
            ([left, right], _) => Ok(Some((*left, *right))),
            ([left, right, _], None) => Ok(Some((*left, *right))),
            (children, _) => Err(DistanceError::NotBinary {
                node,
                degree: children.len(),
            }),
        }
    }

    fn partner_is_internal(&self, node: NodeIndex) -> Result<bool> {
        let n = self.get(&node)?;
        let partner = match n.parent {
            Some(parent_id) => {
                let parent = self.get(&parent_id)?;
                match (parent.parent, parent.children.as_slice()) {
                    // Pass-through root: the edge continues into the sibling
                    (None, [a, b]) => {
                        if *a == node {
                            *b
                        } else {
                            *a
                        }
                    }
                    _ => parent_id,
                }
            }
            None => match n.children.as_slice() {
                [_, _, third] => *third,
                _ => return Ok(false),
            },
        };
        Ok(!self.get(&partner)?.children.is_empty())
    }
}
