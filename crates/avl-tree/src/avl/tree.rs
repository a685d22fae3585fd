use std::borrow::Borrow;
use std::fmt::Display;

use tracing::debug;

use crate::arena::Arena;
use crate::error::TreeError;
use crate::print;

use super::types::AvlNode;
use super::util::{self, Slot};

/// Ordered set of unique keys kept height-balanced under the AVL invariant.
///
/// Nodes live in an arena and refer to each other by index; callers only ever
/// see keys.
#[derive(Debug, Clone)]
pub struct AvlTree<T> {
    arena: Arena<T>,
    root: Option<u32>,
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AvlTree<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree, read from the root's cached height.
    pub fn height(&self) -> u32 {
        util::height(&self.arena, self.root)
    }

    /// Key stored at the root.
    pub fn root(&self) -> Option<&T> {
        self.root.map(|i| &self.arena[i].k)
    }

    pub fn min(&self) -> Option<&T> {
        util::first(&self.arena, self.root).map(|i| &self.arena[i].k)
    }

    pub fn max(&self) -> Option<&T> {
        util::last(&self.arena, self.root).map(|i| &self.arena[i].k)
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        if let Some(root) = self.root.take() {
            let dropped = self.arena.release_subtree(root);
            debug!(dropped, "cleared tree");
        }
    }
}

impl<T: Ord> AvlTree<T> {
    /// Inserts `key`, rebalancing on the way back up.
    ///
    /// A key that is already present is rejected with
    /// [`TreeError::DuplicateKey`] and the tree is not touched.
    pub fn insert(&mut self, key: T) -> Result<(), TreeError> {
        let slot = util::find_slot(&self.arena, self.root, &key);
        if let Slot::Occupied(at) = slot {
            debug!(at, "duplicate key rejected");
            return Err(TreeError::DuplicateKey);
        }

        let n = self.arena.alloc(AvlNode::new(key));
        let root = match (slot, self.root) {
            (Slot::Left(p), Some(root)) => util::insert_left(&mut self.arena, root, n, p),
            (Slot::Right(p), Some(root)) => util::insert_right(&mut self.arena, root, n, p),
            _ => n,
        };
        self.root = Some(root);
        debug!(node = n, len = self.len(), height = self.height(), "inserted");
        Ok(())
    }

    /// Finds the stored key equal to `key`.
    pub fn search<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        util::find(&self.arena, self.root, key).map(|i| &self.arena[i].k)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_some()
    }

    /// Like [`search`](Self::search), but tells an empty tree apart from a miss.
    pub fn get<Q>(&self, key: &Q) -> Result<&T, TreeError>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        self.search(key).ok_or(TreeError::NotFound)
    }

    /// Removes `key` and returns it. Removing an absent key is a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.root?;
        let Some(n) = util::find(&self.arena, Some(root), key) else {
            debug!("remove of absent key ignored");
            return None;
        };
        let (root, removed) = util::remove(&mut self.arena, root, n);
        self.root = root;
        debug!(node = n, len = self.len(), height = self.height(), "removed");
        Some(removed)
    }

    /// Like [`remove`](Self::remove), but reports why nothing was removed.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<T, TreeError>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.is_empty() {
            return Err(TreeError::EmptyTree);
        }
        self.remove(key).ok_or(TreeError::NotFound)
    }

    /// Verifies links, cached heights, balance and key order of the whole tree.
    pub fn assert_valid(&self) -> Result<(), String> {
        util::assert_avl_tree(&self.arena, self.root)
    }
}

impl<T: Display> AvlTree<T> {
    /// Single-line pre-order dump: `key (height: h)`, ` L <left>` and
    /// ` R <right>` when present, then ` U` as each subtree closes. Empty for an
    /// empty tree.
    pub fn print(&self) -> String {
        print::print_inline(&self.arena, self.root)
    }

    /// Multi-line box-drawing dump of the tree.
    pub fn to_tree_string(&self, tab: &str) -> String {
        print::print_layout(&self.arena, self.root, tab)
    }
}

impl<T: Ord> Extend<T> for AvlTree<T> {
    /// Inserts in iteration order; duplicates are skipped.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key).ok();
        }
    }
}

impl<T: Ord> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
