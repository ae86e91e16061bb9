use thiserror::Error;

/// Failure to decode a [`Find`](crate::Find) from its persisted form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FindError {
    #[error("unknown seek mode ordinal: {0}")]
    UnknownOrdinal(i8),

    #[error("unknown seek mode: {0:?}")]
    UnknownName(String),
}

/// Structural invariant violated by an arena tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("root {0} has a parent")]
    RootHasParent(u32),

    #[error("broken parent link on {side} child of node {node}")]
    BrokenParentLink { node: u32, side: &'static str },

    #[error("balance factor mismatch at node {node}: expected {expected}, got {actual}")]
    BalanceFactor { node: u32, expected: i32, actual: i32 },

    #[error("AVL balance violated at node {0}")]
    Unbalanced(u32),

    #[error("node order violated at node {0}")]
    OrderViolated(u32),

    #[error("cached {what} is stale")]
    StaleCache { what: &'static str },
}
