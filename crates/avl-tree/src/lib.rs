//! Self-balancing binary search tree (AVL) over an index arena.
//!
//! Every node caches the height of its subtree and keeps a back link to its
//! parent, so a mutation repairs balance by walking upward from the point of
//! change instead of re-descending from the root.
//!
//! Instead of raw pointers, all links are `Option<u32>` indices into an
//! [`Arena`](arena::Arena) owned by the tree. Splicing a subtree rewrites
//! indices only; discarding one walks owning child links only.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`avl::types`] | [`AvlNode`] record |
//! [`avl::util`] | heights, rotations, rebalancing walk, insert/remove splices |
//! [`avl::tree`] | [`AvlTree`] facade |
//! [`arena`] | slot storage with free list and subtree teardown |
//! [`print`] | inline and box-drawing diagnostic dumps |
//! [`loader`] | bulk insert from whitespace-separated text |
//! [`error`] | [`TreeError`] |
//!
//! ```
//! use avl_tree::{AvlTree, TreeError};
//!
//! let mut tree = AvlTree::new();
//! for k in [10, 20, 30] {
//!     tree.insert(k).unwrap();
//! }
//! assert_eq!(tree.root(), Some(&20));
//! assert_eq!(tree.insert(20), Err(TreeError::DuplicateKey));
//! assert_eq!(tree.remove(&10), Some(10));
//! assert_eq!(tree.search(&10), None);
//! ```

pub mod arena;
pub mod avl;
pub mod error;
pub mod loader;
pub mod print;

pub use avl::{AvlNode, AvlTree};
pub use error::TreeError;
pub use loader::{load, load_file, LoadError, LoadReport};
