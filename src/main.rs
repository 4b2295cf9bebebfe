use clap::Parser;
use env_logger::Env;
use log::{error, info};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tree_split_distances::TaxonIndex;
use tree_split_distances::distances::compare_split_tables;
use tree_split_distances::io::{read_tree_file, write_comparison};
use tree_split_distances::splits::SplitTable;

/// Compare two unrooted trees on the same taxa and print their normalized
/// Robinson-Foulds and Generalized Robinson-Foulds distances, one per line.
#[derive(Parser, Debug)]
#[command(name = "tree-split-distances", version, about = "RF and GRF distance between two trees")]
struct Args {
    /// Reference tree (Newick or NEXUS, optionally .gz); species ids follow its leaves
    tree1: PathBuf,

    /// Tree compared against the reference
    tree2: PathBuf,

    /// Number of decimals for printed distances (default: shortest exact form)
    #[arg(short = 'p', long = "precision")]
    precision: Option<usize>,

    /// Also print the raw RF split count as a third line
    #[arg(long = "raw", default_value_t = false)]
    raw: bool,

    /// Quiet mode: only warnings and errors on stderr
    #[arg(short = 'q', long = "quiet", default_value_t = false)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    let default_filter = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let t0 = Instant::now();
    let tree1 = read_or_exit(&args.tree1);
    let tree2 = read_or_exit(&args.tree2);
    info!("Reading trees {:.3}s", t0.elapsed().as_secs_f64());

    let t1 = Instant::now();
    let tables = TaxonIndex::from_topology(&tree1).and_then(|taxa| {
        let splits1 = SplitTable::from_topology(&tree1, &taxa)?;
        let splits2 = SplitTable::from_topology(&tree2, &taxa)?;
        Ok((taxa, splits1, splits2))
    });
    let (taxa, splits1, splits2) = match tables {
        Ok(t) => t,
        Err(e) => {
            if e.is_input_mismatch() {
                error!("Trees do not share a taxon set: {e}");
            } else {
                error!("Failed to build split tables: {e}");
            }
            std::process::exit(4);
        }
    };
    info!(
        "Encoding {} taxa into {} and {} splits {:.3}s",
        taxa.len(),
        splits1.len(),
        splits2.len(),
        t1.elapsed().as_secs_f64()
    );

    let t2 = Instant::now();
    let comparison = compare_split_tables(&splits1, &splits2);
    info!("Determining distances {:.3}s", t2.elapsed().as_secs_f64());

    let stdout = io::stdout();
    if let Err(e) = write_comparison(&mut stdout.lock(), &comparison, args.precision, args.raw) {
        error!("Failed to write results: {e}");
        std::process::exit(5);
    }
}

fn read_or_exit(path: &Path) -> phylotree::tree::Tree {
    match read_tree_file(path) {
        Ok(tree) => tree,
        Err(e) => {
            error!("Failed to read tree {:?}: {e}", path);
            std::process::exit(3);
        }
    }
}
