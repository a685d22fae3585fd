/// One AVL tree node stored in an [`Arena`](crate::arena::Arena).
///
/// `l` and `r` are owning links: a node is reachable through exactly one of
/// them (or is the root). `p` is the non-owning back link and is `None` only
/// for the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvlNode<T> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub k: T,
    /// Cached subtree height, `1 + max(height(l), height(r))`. A leaf has 1.
    pub h: u32,
}

impl<T> AvlNode<T> {
    pub fn new(k: T) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            k,
            h: 1,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.l.is_none() && self.r.is_none()
    }
}
