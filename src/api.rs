//! Python binding layer for tree comparisons.
//!
//! Provides Python functions computing RF and GRF distances from tree files
//! or Newick strings.

use phylotree::tree::Tree as PhyloTree;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::distances::{compare_against_reference as compare_many, compare_trees};
use crate::error::DistanceError;
use crate::io::{parse_tree_description, read_tree_file};

fn to_py_err(e: DistanceError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Compare two tree files.
///
/// Args:
///     path1: Reference tree file (Newick or NEXUS, optionally gzipped)
///     path2: Tree file compared against the reference
///
/// Returns:
///     A tuple (normalized_rf, grf)
///
/// Raises:
///     ValueError: If a file cannot be read, the taxon sets differ, or a tree is not binary
#[pyfunction]
fn compare_tree_files(path1: String, path2: String) -> PyResult<(f64, f64)> {
    let tree1 = read_tree_file(&path1).map_err(to_py_err)?;
    let tree2 = read_tree_file(&path2).map_err(to_py_err)?;
    let c = compare_trees(&tree1, &tree2).map_err(to_py_err)?;
    Ok((c.normalized_rf, c.grf))
}

/// Compare two Newick strings.
///
/// Returns:
///     A tuple (rf, normalized_rf, grf)
///
/// Raises:
///     ValueError: If a string cannot be parsed, the taxon sets differ, or a tree is not binary
#[pyfunction]
fn compare_newick(newick1: &str, newick2: &str) -> PyResult<(f64, f64, f64)> {
    let tree1 = parse_tree_description(newick1).map_err(to_py_err)?;
    let tree2 = parse_tree_description(newick2).map_err(to_py_err)?;
    let c = compare_trees(&tree1, &tree2).map_err(to_py_err)?;
    Ok((c.rf, c.normalized_rf, c.grf))
}

/// Compare one reference tree file with many tree files.
///
/// Args:
///     reference: Reference tree file; species ids follow its leaves
///     paths: Tree files compared against the reference
///
/// Returns:
///     A list of (normalized_rf, grf) tuples in the order of `paths`
///
/// Raises:
///     ValueError: On the first file that cannot be read or compared
#[pyfunction]
fn compare_against_reference(reference: String, paths: Vec<String>) -> PyResult<Vec<(f64, f64)>> {
    let reference = read_tree_file(&reference).map_err(to_py_err)?;
    let trees: Vec<PhyloTree> = paths
        .iter()
        .map(read_tree_file)
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_py_err)?;

    compare_many(&reference, &trees)
        .map_err(to_py_err)?
        .into_iter()
        .map(|r| r.map(|c| (c.normalized_rf, c.grf)).map_err(to_py_err))
        .collect()
}

/// Python module definition
#[pymodule]
fn tree_split_distances(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compare_tree_files, m)?)?;
    m.add_function(wrap_pyfunction!(compare_newick, m)?)?;
    m.add_function(wrap_pyfunction!(compare_against_reference, m)?)?;
    Ok(())
}
