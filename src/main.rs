//! Interactive PATRICIA trie dictionary.
//!
//! Optionally preloads word lists, then runs the numbered menu on stdin/stdout.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use patricia_dict::{loader, shell, PatriciaTrie, SplitPlacement, TrieConfig};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Placement {
    /// Split at the leaf reached by the descent
    Leaf,
    /// Keep bit indexes increasing along every path (always sorted output)
    CritBit,
}

impl From<Placement> for SplitPlacement {
    fn from(p: Placement) -> Self {
        match p {
            Placement::Leaf => SplitPlacement::Leaf,
            Placement::CritBit => SplitPlacement::CritBit,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "patricia")]
#[command(about = "Word dictionary on a bitwise PATRICIA trie", long_about = None)]
struct Args {
    /// Word lists to load before the menu starts (whitespace-separated words)
    #[arg(short, long)]
    load: Vec<PathBuf>,

    /// Where split branches are linked into the trie
    #[arg(short, long, value_enum, default_value_t = Placement::Leaf)]
    placement: Placement,

    /// Number of words to reserve room for up front
    #[arg(long, default_value_t = 0)]
    capacity: usize,

    /// Print the statistics after loading and exit without the menu
    #[arg(long, default_value_t = false)]
    stats_only: bool,
}

/// Send diagnostics to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    let mut trie = PatriciaTrie::try_with_config(TrieConfig {
        placement: args.placement.into(),
        initial_capacity: args.capacity,
    })
    .with_context(|| format!("reserving room for {} words", args.capacity))?;

    for path in &args.load {
        // An unreadable list is reported and skipped.
        match loader::load_path(&mut trie, path) {
            Ok(n) => println!("{} words loaded from '{}'.", n, path.display()),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    let stdout = io::stdout();
    if args.stats_only {
        shell::print_stats(&trie, &mut stdout.lock()).context("writing statistics")?;
        return Ok(());
    }

    shell::run(&mut trie, io::stdin().lock(), stdout.lock()).context("terminal I/O failed")?;
    Ok(())
}
