//! Species ids shared by both trees of a comparison.
//!
//! Ids are handed out from the reference tree's leaves in the order the tree
//! enumerates them, starting at 0. The second tree is encoded against the same
//! index so that bit `i` means the same taxon in both split tables.

use crate::error::{DistanceError, Result};
use crate::topology::SplitTopology;
use log::debug;
use std::collections::HashMap;

/// Dense, insertion ordered mapping between leaf labels and species ids.
#[derive(Debug, Clone, Default)]
pub struct TaxonIndex {
    labels: Vec<String>,
    ids: HashMap<String, usize>,
}

impl TaxonIndex {
    /// Index every leaf of `tree`.
    ///
    /// # Errors
    /// `UnnamedLeaf` if a leaf carries no label, `DuplicateTaxon` if two
    /// leaves share one.
    pub fn from_topology<T: SplitTopology + ?Sized>(tree: &T) -> Result<Self> {
        let leaves = tree.leaves();
        let mut index = TaxonIndex {
            labels: Vec::with_capacity(leaves.len()),
            ids: HashMap::with_capacity(leaves.len()),
        };
        for leaf in leaves {
            index.insert(tree.leaf_label(leaf)?)?;
        }
        debug!("indexed {} taxa", index.len());
        Ok(index)
    }

    /// Build an index directly from labels, in the given order.
    pub fn from_labels<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = TaxonIndex::default();
        for label in labels {
            index.insert(label.as_ref())?;
        }
        Ok(index)
    }

    fn insert(&mut self, label: &str) -> Result<usize> {
        if self.ids.contains_key(label) {
            return Err(DistanceError::DuplicateTaxon(label.to_string()));
        }
        let id = self.labels.len();
        self.labels.push(label.to_string());
        self.ids.insert(label.to_string(), id);
        Ok(id)
    }

    /// Species id of `label`, if indexed.
    pub fn get(&self, label: &str) -> Option<usize> {
        self.ids.get(label).copied()
    }

    /// Species id of `label`.
    ///
    /// # Errors
    /// `MissingTaxon` when the label was never indexed: the trees do not share
    /// a taxon set.
    pub fn id_of(&self, label: &str) -> Result<usize> {
        self.get(label).ok_or_else(|| DistanceError::MissingTaxon {
            label: label.to_string(),
        })
    }

    pub fn label(&self, id: usize) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels ordered by species id.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phylotree::tree::Tree as PhyloTree;

    #[test]
    fn test_ids_follow_leaf_order() {
        let tree = PhyloTree::from_newick("((C,A),B,(E,D));").unwrap();
        let index = TaxonIndex::from_topology(&tree).unwrap();

        assert_eq!(index.len(), 5);
        let mut ids: Vec<usize> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|l| index.id_of(l).unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);

        for leaf in tree.get_leaves() {
            let label = tree.leaf_label(leaf).unwrap();
            let id = index.id_of(label).unwrap();
            assert_eq!(index.label(id), Some(label));
        }
    }

    #[test]
    fn test_missing_label_is_input_mismatch() {
        let index = TaxonIndex::from_labels(["A", "B", "C"]).unwrap();
        let err = index.id_of("Z").unwrap_err();
        assert!(err.is_input_mismatch());
        assert!(matches!(err, DistanceError::MissingTaxon { label } if label == "Z"));
    }

    #[test]
    fn test_duplicate_label_is_rejected() {
        assert!(matches!(
            TaxonIndex::from_labels(["A", "B", "A"]),
            Err(DistanceError::DuplicateTaxon(label)) if label == "A"
        ));

        let tree = PhyloTree::from_newick("((A,B),A,(C,D));").unwrap();
        assert!(matches!(
            TaxonIndex::from_topology(&tree),
            Err(DistanceError::DuplicateTaxon(_))
        ));
    }

    #[test]
    fn test_from_labels_is_dense() {
        let index = TaxonIndex::from_labels(["Human", "Chimp", "Gorilla"]).unwrap();
        assert_eq!(index.get("Human"), Some(0));
        assert_eq!(index.get("Chimp"), Some(1));
        assert_eq!(index.get("Gorilla"), Some(2));
        assert_eq!(index.labels(), ["Human", "Chimp", "Gorilla"]);
    }
}
