//! `avl` — load keys from a file into an AVL tree, then remove and look up keys.
//!
//! Usage:
//!   avl <FILE> [--kind int|text] [--remove KEY]... [--search KEY]... [--layout inline|tree]
//!
//! The tree is printed after loading and again after the removals. Set
//! `RUST_LOG=debug` to trace inserts, removals and rotations.

use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use avl_tree::{load_file, AvlTree};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "avl", about = "Build an AVL tree from a file of keys")]
struct Cli {
    /// File of whitespace-separated keys, inserted in order.
    input: PathBuf,
    /// How to parse keys.
    #[arg(long, value_enum, default_value_t = KeyKind::Int)]
    kind: KeyKind,
    /// Key to remove after loading. May be repeated.
    #[arg(long = "remove", value_name = "KEY")]
    remove: Vec<String>,
    /// Key to look up after the removals. May be repeated.
    #[arg(long = "search", value_name = "KEY")]
    search: Vec<String>,
    /// Print format.
    #[arg(long, value_enum, default_value_t = Layout::Inline)]
    layout: Layout,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyKind {
    /// Signed 64-bit integers.
    Int,
    /// Arbitrary tokens, ordered bytewise.
    Text,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Layout {
    /// One line, pre-order.
    Inline,
    /// One node per line.
    Tree,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut out = io::stdout().lock();
    match cli.kind {
        KeyKind::Int => run::<i64, _>(&cli, &mut out),
        KeyKind::Text => run::<String, _>(&cli, &mut out),
    }
}

/// Loads, prints, removes, prints and searches. Bad input (an unreadable
/// file, an unparsable token or key) is logged and skipped; only a failed
/// write to `out` is returned.
fn run<T, W>(cli: &Cli, out: &mut W) -> Result<()>
where
    T: Ord + FromStr + Display,
    T::Err: Display,
    W: Write,
{
    let mut tree = AvlTree::<T>::new();
    match load_file(&mut tree, &cli.input) {
        Ok(report) => info!(
            inserted = report.inserted,
            duplicates = report.duplicates,
            height = tree.height(),
            "loaded"
        ),
        Err(err) => warn!(
            input = %cli.input.display(),
            %err,
            kept = tree.len(),
            "load stopped early"
        ),
    }
    print_tree(&tree, cli.layout, out)?;

    if !cli.remove.is_empty() {
        for raw in &cli.remove {
            let Some(key) = parse_key::<T>(raw) else {
                continue;
            };
            if tree.remove(&key).is_none() {
                info!(key = raw.as_str(), "not present, nothing removed");
            }
        }
        print_tree(&tree, cli.layout, out)?;
    }

    for raw in &cli.search {
        let Some(key) = parse_key::<T>(raw) else {
            continue;
        };
        match tree.search(&key) {
            Some(found) => writeln!(out, "found {found}")?,
            None => writeln!(out, "not found {raw}")?,
        }
    }

    Ok(())
}

fn parse_key<T>(raw: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>()
        .map_err(|err| warn!(key = raw, %err, "invalid key skipped"))
        .ok()
}

fn print_tree<T, W>(tree: &AvlTree<T>, layout: Layout, out: &mut W) -> Result<()>
where
    T: Display,
    W: Write,
{
    match layout {
        Layout::Inline => writeln!(out, "{}", tree.print())?,
        Layout::Tree => writeln!(out, "{}", tree.to_tree_string(""))?,
    }
    Ok(())
}
