//! Errors raised while acquiring trees and comparing their splits.

use phylotree::tree::TreeError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a comparison. There is no degraded result:
/// a comparison either yields both distances or one of these.
#[derive(Error, Debug)]
pub enum DistanceError {
    /// A leaf of the compared tree has no species id in the reference index.
    #[error("leaf '{label}' is not part of the reference taxon set")]
    MissingTaxon { label: String },

    /// The compared tree does not have as many leaves as the reference.
    #[error("taxon sets differ: reference has {expected} leaves, compared tree has {found}")]
    TaxonCountMismatch { expected: usize, found: usize },

    /// The same label sits on more than one leaf of a tree.
    #[error("leaf label '{0}' appears more than once")]
    DuplicateTaxon(String),

    #[error("leaf node {0} has no label")]
    UnnamedLeaf(usize),

    /// An internal node is not resolved into the left/right form splits need.
    #[error("node {node} has {degree} children, expected a binary resolved node")]
    NotBinary { node: usize, degree: usize },

    #[error("node index {0} lies outside the tree")]
    NodeOutOfRange(usize),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("could not parse tree: {0}")]
    Parse(String),

    #[error("no tree definition found")]
    NoTree,

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DistanceError {
    /// True when the two trees simply do not share a taxon set.
    pub fn is_input_mismatch(&self) -> bool {
        matches!(
            self,
            DistanceError::MissingTaxon { .. } | DistanceError::TaxonCountMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DistanceError>;
