//! Interface to the host-managed live tree.
use crate::attributes::Handler;
use std::{error::Error, fmt};
use twig_common::{Atom, Value};

/// A host-managed tree of live nodes.
///
/// The reconciler only ever mutates live nodes through this trait. Errors returned by the host are
/// propagated unchanged to the caller of [`Patch::apply`](crate::Patch::apply).
pub trait Host {
    /// Handle to a live node.
    type Node: Copy + Eq + fmt::Debug;
    type Error: Error + 'static;

    /// Creates a detached element node.
    fn create_element(&mut self, kind: &Atom) -> Result<Self::Node, Self::Error>;

    /// Creates a detached text node.
    fn create_text(&mut self, text: &str) -> Result<Self::Node, Self::Error>;

    fn set_attribute(&mut self, node: Self::Node, name: &Atom, value: &Value) -> Result<(), Self::Error>;

    fn remove_attribute(&mut self, node: Self::Node, name: &Atom) -> Result<(), Self::Error>;

    /// Binds `handler` to `event`, replacing any previous binding for that event.
    fn set_handler(&mut self, node: Self::Node, event: &Atom, handler: &Handler) -> Result<(), Self::Error>;

    fn remove_handler(&mut self, node: Self::Node, event: &Atom) -> Result<(), Self::Error>;

    /// Returns the child of `parent` at `index`.
    fn child_at(&self, parent: Self::Node, index: usize) -> Result<Self::Node, Self::Error>;

    fn child_count(&self, parent: Self::Node) -> Result<usize, Self::Error>;

    /// Appends `child` to the children of `parent`. If `child` is already attached somewhere, it is
    /// moved.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node) -> Result<(), Self::Error>;

    /// Inserts `child` at `index` in the children of `parent`. If `child` is already attached
    /// somewhere, it is moved.
    fn insert_child(&mut self, parent: Self::Node, index: usize, child: Self::Node) -> Result<(), Self::Error>;

    /// Mounts `new` in place of `old`. `old` and its subtree are discarded.
    fn replace(&mut self, old: Self::Node, new: Self::Node) -> Result<(), Self::Error>;

    /// Detaches and discards `node` and its subtree.
    fn remove(&mut self, node: Self::Node) -> Result<(), Self::Error>;
}
