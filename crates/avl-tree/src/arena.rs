//! Slot arena owning every tree node.
//!
//! Nodes never hold references to each other. Every link is an `Option<u32>`
//! index into this arena, so a splice only rewrites indices and never moves a
//! subtree in memory. Vacated slots go on a free list and are reused by later
//! allocations.

use std::ops::{Index, IndexMut};

use crate::avl::types::AvlNode;

#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Option<AvlNode<T>>>,
    free: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores `node` and returns its index, reusing a vacant slot if one exists.
    pub fn alloc(&mut self, node: AvlNode<T>) -> u32 {
        match self.free.pop() {
            Some(i) => {
                self.slots[i as usize] = Some(node);
                i
            }
            None => {
                self.slots.push(Some(node));
                (self.slots.len() - 1) as u32
            }
        }
    }

    /// Vacates slot `i` and hands the node back with its links cleared.
    pub fn release(&mut self, i: u32) -> AvlNode<T> {
        let mut node = self.slots[i as usize]
            .take()
            .expect("release of a vacant arena slot");
        node.p = None;
        node.l = None;
        node.r = None;
        self.free.push(i);
        node
    }

    /// Drops every node reachable from `top` through child links.
    ///
    /// Uses an explicit stack, so arbitrarily deep (even unbalanced, detached)
    /// subtrees never recurse. The parent link is never followed. Returns the
    /// number of nodes dropped.
    pub fn release_subtree(&mut self, top: u32) -> usize {
        let mut stack = vec![top];
        let mut dropped = 0;
        while let Some(i) = stack.pop() {
            let node = self.slots[i as usize]
                .take()
                .expect("subtree link points at a vacant arena slot");
            stack.extend(node.l);
            stack.extend(node.r);
            self.free.push(i);
            dropped += 1;
        }
        if self.free.len() == self.slots.len() {
            self.slots.clear();
            self.free.clear();
        }
        dropped
    }

    pub fn get(&self, i: u32) -> Option<&AvlNode<T>> {
        self.slots.get(i as usize).and_then(Option::as_ref)
    }
}

impl<T> Index<u32> for Arena<T> {
    type Output = AvlNode<T>;

    fn index(&self, i: u32) -> &AvlNode<T> {
        self.slots[i as usize]
            .as_ref()
            .expect("index into a vacant arena slot")
    }
}

impl<T> IndexMut<u32> for Arena<T> {
    fn index_mut(&mut self, i: u32) -> &mut AvlNode<T> {
        self.slots[i as usize]
            .as_mut()
            .expect("index into a vacant arena slot")
    }
}
