//! Crate root: lightweight module orchestration and public re-exports.
//!
//! Modules:
//! - `bitset`: fixed-length bitset for one side of a bipartition, canonical form.
//! - `taxa`: species ids shared by the two compared trees.
//! - `topology`: tree capabilities needed for split encoding + `phylotree` adapter.
//! - `splits`: non-trivial split table of one tree.
//! - `distances`: Robinson-Foulds and Generalized Robinson-Foulds distances.
//! - `io`: reading Newick/NEXUS tree files, writing results.
//! - `error`: error type shared by all of the above.
//! - `api`: Python bindings via `pyo3` (gated behind "python" feature).

pub mod bitset;
pub mod distances;
pub mod error;
pub mod io;
pub mod splits;
pub mod taxa;
pub mod topology;

#[cfg(feature = "python")]
pub mod api;

// Re-export frequently used types & functions
pub use bitset::Bitset;
pub use distances::{TreeComparison, compare_trees};
pub use error::DistanceError;
pub use io::{read_tree_file, write_comparison};
pub use splits::SplitTable;
pub use taxa::TaxonIndex;
pub use topology::SplitTopology;
