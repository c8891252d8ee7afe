//! Error types.
use crate::{mem_tree::NodeId, node::Key};
use thiserror::Error;

/// Violation of the reordering precondition: all siblings of a `REORDER` element must carry a
/// unique key.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("child at index {index} has no key")]
    Missing { index: usize },
    #[error("key `{key}` is used by more than one child")]
    Duplicate { key: Key },
}

/// Errors reported by [`MemTree`](crate::MemTree).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0:?} does not exist")]
    StaleNode(NodeId),
    #[error("node {0:?} is not attached to a parent")]
    Detached(NodeId),
    #[error("node {0:?} is a text node")]
    NotAnElement(NodeId),
    #[error("index {index} is out of bounds for the children of {parent:?}")]
    ChildOutOfBounds { parent: NodeId, index: usize },
    #[error("cannot insert {child:?} inside itself or one of its descendants")]
    Cycle { child: NodeId },
}
