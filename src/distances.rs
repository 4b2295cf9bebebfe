//! Topological distances between two unrooted trees on the same taxa.
//!
//! 1. **Robinson-Foulds (RF)**: number of splits found in exactly one of the
//!    two split tables. Normalized by `(L1 - 3) + (L2 - 3)`, the split count of
//!    two fully resolved trees.
//!
//! 2. **Generalized Robinson-Foulds (GRF)**: instead of all-or-nothing
//!    matching, every unmatched split is scored against every split of the
//!    other tree by how many leaves would have to switch sides.

use crate::bitset::Bitset;
use crate::error::Result;
use crate::splits::SplitTable;
use crate::taxa::TaxonIndex;
use crate::topology::SplitTopology;
use log::debug;
use rayon::prelude::*;

/// Both distances of one tree pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeComparison {
    /// Raw RF distance (a count, stored as a real number)
    pub rf: f64,
    /// RF divided by `(L1 - 3) + (L2 - 3)`
    pub normalized_rf: f64,
    /// Generalized RF distance
    pub grf: f64,
}

/// Robinson-Foulds distance between two split tables built on one taxon index.
///
/// # Algorithm
/// ```text
/// RF = |A \ B| + |B \ A|
/// ```
/// counted with two membership passes, no set difference is materialized.
///
/// # Example
/// ```text
/// Tree 1:  ((A,B),(C,D),(E,F))   splits AB, CD, EF
/// Tree 2:  ((A,B),(C,E),(D,F))   splits AB, CE, DF
///
/// only in 1: CD, EF    only in 2: CE, DF    RF = 4
/// ```
pub fn robinson_foulds(a: &SplitTable, b: &SplitTable) -> f64 {
    let only_a = a.iter().filter(|s| !b.contains(s)).count();
    let only_b = b.iter().filter(|s| !a.contains(s)).count();
    (only_a + only_b) as f64
}

/// RF distance divided by the number of internal edges of two fully resolved
/// trees, `(L1 - 3) + (L2 - 3)`.
///
/// The denominator comes from the leaf counts, not from the table sizes. For
/// trees that are not fully resolved the result is therefore not bounded by 1.
/// Trees with three leaves or fewer have no internal edge and score 0.
pub fn normalized_robinson_foulds(a: &SplitTable, b: &SplitTable) -> f64 {
    let branches = (a.num_leaves() as f64 - 3.0) + (b.num_leaves() as f64 - 3.0);
    if branches <= 0.0 {
        return 0.0;
    }
    robinson_foulds(a, b) / branches
}

/// Disagreement between two splits of the same taxa.
///
/// ```text
/// d(v1, v2) = 2 * min(popcount(v1 ^ v2), popcount(v1 ^ !v2))
/// ```
///
/// The second term is the first one with `v2` flipped, so either orientation
/// of `v2` may be matched. Zero for equal or complementary splits.
pub fn split_distance(v1: &Bitset, v2: &Bitset) -> f64 {
    let hamming = v1.xor_count(v2);
    let flipped = v1.len() - hamming;
    2.0 * hamming.min(flipped) as f64
}

/// One direction of the generalized RF distance.
///
/// Starting from `union = |A|`, each split of `b` missing from `a` grows the
/// union by one and adds its distance to every split of `a`:
///
/// ```text
/// score = Σ_{s2 ∈ B \ A} Σ_{s1 ∈ A} d(s1, s2) / (union * |A|)
/// ```
///
/// Not symmetric on its own. An empty `a` scores 0.
pub fn generalized_rf_directed(a: &SplitTable, b: &SplitTable) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    let mut distance = 0.0;
    let mut union_size = a.len();

    for s2 in b.iter() {
        if a.contains(s2) {
            continue;
        }
        union_size += 1;
        distance += a.iter().map(|s1| split_distance(s1, s2)).sum::<f64>();
    }

    distance / (union_size * a.len()) as f64
}

/// Generalized RF distance: the sum of both directed scores.
pub fn generalized_robinson_foulds(a: &SplitTable, b: &SplitTable) -> f64 {
    generalized_rf_directed(a, b) + generalized_rf_directed(b, a)
}

/// Both distances from two already built split tables.
pub fn compare_split_tables(a: &SplitTable, b: &SplitTable) -> TreeComparison {
    TreeComparison {
        rf: robinson_foulds(a, b),
        normalized_rf: normalized_robinson_foulds(a, b),
        grf: generalized_robinson_foulds(a, b),
    }
}

/// Compare two trees. Species ids come from `first`, and `second` must carry
/// exactly the same leaf labels.
///
/// # Errors
/// Input mismatch when the taxon sets differ, malformed tree errors when
/// either tree is not a binary resolved unrooted tree.
pub fn compare_trees<A, B>(first: &A, second: &B) -> Result<TreeComparison>
where
    A: SplitTopology + ?Sized,
    B: SplitTopology + ?Sized,
{
    let taxa = TaxonIndex::from_topology(first)?;
    let splits_a = SplitTable::from_topology(first, &taxa)?;
    let splits_b = SplitTable::from_topology(second, &taxa)?;
    debug!(
        "{} taxa, {} and {} non-trivial splits",
        taxa.len(),
        splits_a.len(),
        splits_b.len()
    );
    Ok(compare_split_tables(&splits_a, &splits_b))
}

/// Compare one reference tree with many others, each against the
/// reference's taxon index.
///
/// Trees are encoded one after the other, the pairwise distances are then
/// computed in parallel over the finished split tables. Results keep the
/// order of `others`; a tree that fails to encode only fails its own entry.
///
/// # Errors
/// The outer error is reserved for a reference tree that cannot be encoded.
pub fn compare_against_reference<R, T>(
    reference: &R,
    others: &[T],
) -> Result<Vec<Result<TreeComparison>>>
where
    R: SplitTopology + ?Sized,
    T: SplitTopology,
{
    let taxa = TaxonIndex::from_topology(reference)?;
    let reference_splits = SplitTable::from_topology(reference, &taxa)?;

    let tables: Vec<Result<SplitTable>> = others
        .iter()
        .map(|other| SplitTable::from_topology(other, &taxa))
        .collect();

    Ok(tables
        .into_par_iter()
        .map(|table| table.map(|splits| compare_split_tables(&reference_splits, &splits)))
        .collect())
}
