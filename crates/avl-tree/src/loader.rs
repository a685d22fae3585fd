//! Bulk loading of whitespace-separated keys.
//!
//! Tokens are inserted in the order they appear. Duplicates are counted and
//! skipped; the first token that does not parse stops the load, leaving the
//! keys inserted so far in place.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};

use crate::avl::AvlTree;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: cannot parse {token:?}")]
    Parse { line: usize, token: String },
}

/// Summary of a finished load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub inserted: usize,
    pub duplicates: usize,
}

/// Parses every token of `reader` as `T` and inserts it into `tree`.
pub fn load<T, R>(tree: &mut AvlTree<T>, reader: R) -> Result<LoadReport, LoadError>
where
    T: Ord + FromStr,
    R: BufRead,
{
    let mut report = LoadReport::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        for token in line.split_whitespace() {
            let key = token.parse::<T>().map_err(|_| LoadError::Parse {
                line: idx + 1,
                token: token.to_string(),
            })?;
            match tree.insert(key) {
                Ok(()) => report.inserted += 1,
                Err(err) => {
                    warn!(line = idx + 1, token, %err, "key skipped");
                    report.duplicates += 1;
                }
            }
        }
    }
    debug!(
        inserted = report.inserted,
        duplicates = report.duplicates,
        "load finished"
    );
    Ok(report)
}

/// Opens `path` and [`load`]s it. An unopenable file inserts nothing.
pub fn load_file<T, P>(tree: &mut AvlTree<T>, path: P) -> Result<LoadReport, LoadError>
where
    T: Ord + FromStr,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load(tree, BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn loads_tokens_across_lines() {
        let mut tree = AvlTree::<i32>::new();
        let report = load(&mut tree, Cursor::new("3 1\n\n  2\t5\n4")).unwrap();
        assert_eq!(
            report,
            LoadReport {
                inserted: 5,
                duplicates: 0
            }
        );
        assert_eq!(tree.len(), 5);
        tree.assert_valid().unwrap();
    }

    #[test]
    fn counts_duplicates() {
        let mut tree = AvlTree::<i32>::new();
        let report = load(&mut tree, Cursor::new("1 2 1 2 3")).unwrap();
        assert_eq!(report.inserted, 3);
        assert_eq!(report.duplicates, 2);
    }

    #[test]
    fn parse_error_keeps_earlier_keys() {
        let mut tree = AvlTree::<i32>::new();
        let err = load(&mut tree, Cursor::new("1 2\nx 3")).unwrap_err();
        match err {
            LoadError::Parse { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(tree.len(), 2);
        assert!(!tree.contains(&3));
        tree.assert_valid().unwrap();
    }
}
