use thiserror::Error;

/// Non-fatal outcomes of tree operations. The tree is left valid and
/// unchanged whenever one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("tree does not accept duplicate keys")]
    DuplicateKey,
    #[error("key not found")]
    NotFound,
    #[error("tree is empty")]
    EmptyTree,
}
