//! AVL balancing engine and its public facade.

pub mod tree;
pub mod types;
pub mod util;

pub use tree::AvlTree;
pub use types::AvlNode;
pub use util::{assert_avl_tree, balance_factor, height, rebalance, recompute_height};
