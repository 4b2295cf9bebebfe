//! Encode the non-trivial bipartitions of a tree as a split table.
//!
//! # Overview
//! Removing an internal edge cuts an unrooted tree in two. Each part holds at
//! least two leaves; edges ending in a leaf are trivial and never recorded.
//!
//! ```text
//!   A         D
//!    \       /
//!     x --- y        edge x-y splits {A,B} | {C,D}
//!    /       \
//!   B         C
//! ```
//!
//! # Algorithm
//! 1. Walk the tree in post order, keeping one bitset per node in a pre-sized
//!    arena indexed by node index.
//! 2. A leaf sets its own species id bit.
//! 3. An internal node ORs its left and right children.
//! 4. If the partner across the node's edge is internal as well, the edge is
//!    non-trivial: canonicalize the bitset (leaf 0 set) and insert it.
//!
//! The set absorbs the same edge seen from both of its endpoints.

use crate::bitset::Bitset;
use crate::error::{DistanceError, Result};
use crate::taxa::TaxonIndex;
use crate::topology::SplitTopology;
use log::trace;
use std::collections::HashSet;

/// Canonical non-trivial splits of one tree.
///
/// # Fields
/// - `splits`: canonical bitsets, one per distinct internal edge
/// - `num_leaves`: leaf count of the encoded tree (the `L` in `L - 3`)
#[derive(Debug, Clone)]
pub struct SplitTable {
    splits: HashSet<Bitset>,
    num_leaves: usize,
}

impl SplitTable {
    /// Encode `tree` against a shared taxon index.
    ///
    /// # Errors
    /// - `TaxonCountMismatch` / `MissingTaxon`: the tree's leaves are not
    ///   exactly the indexed taxa.
    /// - `DuplicateTaxon`: a label occurs on two leaves.
    /// - `NotBinary`, `NodeOutOfRange`, `Tree`: the tree cannot be walked as a
    ///   binary resolved unrooted tree.
    pub fn from_topology<T: SplitTopology + ?Sized>(tree: &T, taxa: &TaxonIndex) -> Result<Self> {
        let num_leaves = tree.leaf_count();
        if num_leaves != taxa.len() {
            return Err(DistanceError::TaxonCountMismatch {
                expected: taxa.len(),
                found: num_leaves,
            });
        }

        let node_count = tree.node_count();
        let mut scratch: Vec<Bitset> = vec![Bitset::zeros(num_leaves); node_count];
        let mut seen = Bitset::zeros(num_leaves);
        let mut splits = HashSet::with_capacity(num_leaves.saturating_sub(3));

        for node in tree.post_order()? {
            if node >= node_count {
                return Err(DistanceError::NodeOutOfRange(node));
            }
            match tree.children(node)? {
                None => {
                    let label = tree.leaf_label(node)?;
                    let spid = taxa.id_of(label)?;
                    if seen.get(spid) {
                        return Err(DistanceError::DuplicateTaxon(label.to_string()));
                    }
                    seen.set(spid);
                    scratch[node].set(spid);
                }
                Some((left, right)) => {
                    let mut merged = scratch
                        .get(left)
                        .ok_or(DistanceError::NodeOutOfRange(left))?
                        .clone();
                    merged.or_assign(
                        scratch
                            .get(right)
                            .ok_or(DistanceError::NodeOutOfRange(right))?,
                    );
                    if tree.partner_is_internal(node)? {
                        let split = merged.clone().canonical();
                        trace!("node {node}: split {:?}", split.words());
                        splits.insert(split);
                    }
                    scratch[node] = merged;
                }
            }
        }

        Ok(SplitTable { splits, num_leaves })
    }

    /// Build a table from raw bitsets, canonicalizing each one.
    pub fn from_splits<I: IntoIterator<Item = Bitset>>(num_leaves: usize, splits: I) -> Self {
        SplitTable {
            splits: splits.into_iter().map(Bitset::canonical).collect(),
            num_leaves,
        }
    }

    /// Whether the bipartition of `split` is present, in either orientation.
    pub fn contains(&self, split: &Bitset) -> bool {
        if split.is_canonical() {
            self.splits.contains(split)
        } else {
            self.splits.contains(&split.complement())
        }
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// Leaf count of the encoded tree.
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bitset> {
        self.splits.iter()
    }
}
