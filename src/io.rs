use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use log::debug;
use phylotree::tree::Tree;

use crate::distances::TreeComparison;
use crate::error::{DistanceError, Result};

/// Strip BEAST annotations from Newick strings.
///
/// BEAST format includes annotations like :[&rate=0.123]2.45 where 2.45 is the actual branch length.
/// This function removes the [&...] annotations while preserving the branch lengths.
fn strip_beast_annotations(newick: &str) -> String {
    let mut result = String::with_capacity(newick.len());
    let mut in_annotation = false;
    let mut chars = newick.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '[' && chars.peek() == Some(&'&') {
            in_annotation = true;
        } else if ch == ']' && in_annotation {
            in_annotation = false;
        } else if !in_annotation && ch != '\n' && ch != '\r' {
            result.push(ch);
        }
    }

    result
}

/// Drop whitespace outside quoted labels.
///
/// `from_newick` keeps every character of a name, so `(A, B)` would otherwise
/// yield a leaf called `" B"` and a branch length of `" 0.1"`.
fn strip_whitespace(newick: &str) -> String {
    let mut result = String::with_capacity(newick.len());
    let mut quote: Option<char> = None;

    for ch in newick.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch.is_whitespace() => continue,
            None => {}
        }
        result.push(ch);
    }

    result
}

/// Read one tree from a Newick or NEXUS file. Files ending in `.gz` are
/// decompressed on the fly.
pub fn read_tree_file<P: AsRef<Path>>(path: P) -> Result<Tree> {
    let p = path.as_ref();
    let content = read_to_string(p).map_err(|source| DistanceError::Io {
        path: p.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from {:?}", content.len(), p);
    parse_tree_description(&content)
}

fn read_to_string(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut content = String::new();
    if path.to_string_lossy().ends_with(".gz") {
        GzDecoder::new(BufReader::new(file)).read_to_string(&mut content)?;
    } else {
        BufReader::new(file).read_to_string(&mut content)?;
    }
    Ok(content)
}

/// Parse the first tree of a Newick string or NEXUS document.
///
/// - Newick: everything up to the first `;`.
/// - NEXUS (`#NEXUS` header): the first `tree NAME = ...` statement, with leaf
///   labels passed through the TRANSLATE table when there is one.
pub fn parse_tree_description(content: &str) -> Result<Tree> {
    let is_nexus = content
        .trim_start()
        .to_ascii_uppercase()
        .starts_with("#NEXUS");

    if is_nexus {
        let taxons = parse_taxon_block(content);
        let block = collect_tree_blocks(content)
            .into_iter()
            .next()
            .ok_or(DistanceError::NoTree)?;
        let mut tree = parse_newick(&block.body)?;
        if !taxons.is_empty() {
            rename_leaf_nodes(&mut tree, &taxons);
        }
        Ok(tree)
    } else {
        let end = content.find(';').ok_or(DistanceError::NoTree)?;
        parse_newick(&content[..=end])
    }
}

fn parse_newick(raw: &str) -> Result<Tree> {
    let newick = strip_whitespace(&strip_beast_annotations(raw));
    Tree::from_newick(&newick).map_err(|e| DistanceError::Parse(e.to_string()))
}

struct TreeBlock {
    header: String,
    body: String,
}

fn collect_tree_blocks(content: &str) -> Vec<TreeBlock> {
    content
        .lines()
        .map(str::trim)
        .skip_while(|line| !line.to_ascii_uppercase().starts_with("TREE "))
        .take_while(|line| !line.to_ascii_uppercase().starts_with("END;"))
        .filter_map(|line| {
            // `tree STATE_0 [&lnP=-1] = [&R] (...)`: the header annotation holds an '='
            let line = strip_beast_annotations(line);
            let (header, body) = line.split_once('=')?;
            Some(TreeBlock {
                header: header.trim().to_string(),
                body: body.trim().to_string(),
            })
        })
        .inspect(|block| debug!("found tree statement '{}'", block.header))
        .collect()
}

fn parse_taxon_block(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .skip_while(|line| !line.trim().to_ascii_uppercase().starts_with("TRANSLATE"))
        .skip(1)
        .take_while(|line| !line.trim().starts_with(';'))
        // STRUCTURE:
        // 1 '1959.M.CD.59.ZR59',
        // 2 '1960.DRC60A',
        .filter_map(|line| {
            let line = line.trim().trim_end_matches(';').trim_end_matches(',');
            let mut parts = line.split_whitespace();
            let id = parts.next()?.to_string();
            let label = parts.next()?.trim_matches('\'').to_string();
            Some((id, label))
        })
        .collect::<HashMap<_, _>>()
}

/// Replace leaf names found in `translate`; names without an entry are kept.
fn rename_leaf_nodes(phylo_tree: &mut Tree, translate: &HashMap<String, String>) {
    for leaf_id in phylo_tree.get_leaves() {
        if let Ok(node) = phylo_tree.get_mut(&leaf_id) {
            node.name = node
                .name
                .take()
                .map(|n| translate.get(&n).cloned().unwrap_or(n));
        }
    }
}

/// Write the normalized RF and GRF distances, one per line, optionally
/// followed by the raw RF count.
///
/// `precision` fixes the number of decimals; `None` prints the shortest
/// representation that round-trips.
pub fn write_comparison<W: Write>(
    out: &mut W,
    comparison: &TreeComparison,
    precision: Option<usize>,
    raw: bool,
) -> io::Result<()> {
    let mut values = vec![comparison.normalized_rf, comparison.grf];
    if raw {
        values.push(comparison.rf);
    }
    for value in values {
        match precision {
            Some(digits) => writeln!(out, "{value:.digits$}")?,
            None => writeln!(out, "{value}")?,
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::SplitTopology;

    fn leaf_names(tree: &Tree) -> Vec<String> {
        let mut names: Vec<String> = tree
            .leaves()
            .into_iter()
            .map(|leaf| tree.leaf_label(leaf).unwrap().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_strip_annotations() {
        let s = "(A:[&rate=0.1]1.0,B:[&rate=0.2]2.0);";
        assert_eq!(strip_beast_annotations(s), "(A:1.0,B:2.0);");
    }

    #[test]
    fn test_parse_plain_newick() {
        let tree = parse_tree_description("((A,B),C,\n(D,E));\n((A,C),B,(D,E));").unwrap();
        assert_eq!(leaf_names(&tree), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_parse_nexus_with_translate() {
        let nexus = "#NEXUS\n\
            Begin trees;\n\
            \tTranslate\n\
            \t\t1 Human,\n\
            \t\t2 Chimp,\n\
            \t\t3 Gorilla,\n\
            \t\t4 Orang\n\
            \t\t;\n\
            tree STATE_0 = ((1:[&rate=1.0]0.1,2:0.1):0.2,3:0.3,4:0.4);\n\
            tree STATE_1000 = ((1:0.1,3:0.1):0.2,2:0.3,4:0.4);\n\
            End;\n";
        let tree = parse_tree_description(nexus).unwrap();
        assert_eq!(leaf_names(&tree), ["Chimp", "Gorilla", "Human", "Orang"]);
    }

    #[test]
    fn test_strip_whitespace_keeps_quoted_labels() {
        assert_eq!(
            strip_whitespace("((A, B) ,\tC : 0.1, ('D d', \"E e\"));"),
            "((A,B),C:0.1,('D d',\"E e\"));"
        );
    }

    #[test]
    fn test_parse_spaced_newick() {
        let tree = parse_tree_description("( (A : 0.1, B:0.2) , C,\n  (D, E) ) ;").unwrap();
        assert_eq!(leaf_names(&tree), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_parse_nexus_with_root_annotation() {
        let nexus = "#NEXUS\n\
            Begin trees;\n\
            \tTranslate\n\
            \t\t1 Human,\n\
            \t\t2 Chimp,\n\
            \t\t3 Gorilla,\n\
            \t\t4 Orang\n\
            \t\t;\n\
            tree STATE_0 [&lnP=-1.5] = [&R] ((1:[&rate=1.0]0.1, 2:0.1):0.2, 3:0.3, 4:0.4);\n\
            End;\n";
        let tree = parse_tree_description(nexus).unwrap();
        assert_eq!(leaf_names(&tree), ["Chimp", "Gorilla", "Human", "Orang"]);

        let blocks = collect_tree_blocks(nexus);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].header, "tree STATE_0");
    }

    #[test]
    fn test_missing_tree_is_reported() {
        assert!(matches!(
            parse_tree_description("no tree here"),
            Err(DistanceError::NoTree)
        ));
        assert!(matches!(
            parse_tree_description("#NEXUS\nBegin taxa;\nEnd;\n"),
            Err(DistanceError::NoTree)
        ));
    }

    #[test]
    fn test_write_comparison() {
        let comparison = TreeComparison {
            rf: 4.0,
            normalized_rf: 4.0 / 6.0,
            grf: 3.2,
        };

        let mut out = Vec::new();
        write_comparison(&mut out, &comparison, Some(3), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0.667\n3.200\n");

        let mut out = Vec::new();
        write_comparison(&mut out, &comparison, None, true).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0.6666666666666666\n3.2\n4\n"
        );
    }
}
