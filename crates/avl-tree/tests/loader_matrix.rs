use std::io::Cursor;
use std::path::PathBuf;

use avl_tree::{load, load_file, AvlTree, LoadError, LoadReport};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("avl-tree-{}-{name}", std::process::id()))
}

#[test]
fn load_file_inserts_in_file_order() {
    let path = temp_path("ints.txt");
    std::fs::write(&path, "4 2 6\n1 3 5 7\n").unwrap();

    let mut tree = AvlTree::<i64>::new();
    let report = load_file(&mut tree, &path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(
        report,
        LoadReport {
            inserted: 7,
            duplicates: 0
        }
    );
    assert_eq!(tree.root(), Some(&4));
    tree.assert_valid().unwrap();
}

#[test]
fn unopenable_file_inserts_nothing() {
    let path = temp_path("missing.txt");
    let mut tree = AvlTree::<i64>::new();
    let err = load_file(&mut tree, &path).unwrap_err();
    assert!(matches!(err, LoadError::Open { .. }), "{err}");
    assert!(err.to_string().contains("unable to open"));
    assert!(tree.is_empty());
}

#[test]
fn load_into_non_empty_tree_reports_duplicates() {
    let mut tree: AvlTree<String> = ["b".to_string()].into_iter().collect();
    let report = load(&mut tree, Cursor::new("a b c\nc")).unwrap();
    assert_eq!(report.inserted, 2);
    assert_eq!(report.duplicates, 2);
    assert_eq!(tree.len(), 3);
}

#[test]
fn empty_source_loads_nothing() {
    let mut tree = AvlTree::<i32>::new();
    let report = load(&mut tree, Cursor::new("")).unwrap();
    assert_eq!(report, LoadReport::default());
    assert!(tree.is_empty());
}
