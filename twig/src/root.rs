//! Root of a reconciled tree.
use crate::{
    context::TreeCtx,
    diff::{diff_with, DiffOptions},
    host::Host,
    node::VNode,
    patch::Patch,
};
use tracing::debug;

/// A description tree mounted in a live tree, and kept in sync with later descriptions.
///
/// Holds the description of the last render pass, which is the baseline of the next diff.
pub struct Root<H: Host> {
    node: H::Node,
    tree: VNode,
    options: DiffOptions,
}

impl<H: Host> Root<H> {
    /// Materializes `tree` and mounts it in place of `slot`.
    pub fn mount(cx: &mut TreeCtx<H>, slot: H::Node, tree: VNode) -> Result<Root<H>, H::Error> {
        Root::mount_with(cx, slot, tree, DiffOptions::default())
    }

    /// Same as [`Root::mount`], with the options used for every later update.
    pub fn mount_with(cx: &mut TreeCtx<H>, slot: H::Node, tree: VNode, options: DiffOptions) -> Result<Root<H>, H::Error> {
        let node = cx.materialize(&tree)?;
        cx.mount(node, slot)?;
        debug!(?node, ?slot, "root mounted");
        Ok(Root { node, tree, options })
    }

    /// Reconciles the live tree with a new description.
    ///
    /// Returns the live root node, which changes if the root itself had to be replaced. If the host
    /// fails, the error is returned and the previous description is kept as the baseline.
    pub fn update(&mut self, cx: &mut TreeCtx<H>, tree: VNode) -> Result<H::Node, H::Error> {
        let patch = diff_with(Some(&self.tree), Some(&tree), &self.options);
        let noop = patch.is_noop();
        if let Some(node) = patch.apply(cx, self.node)? {
            self.node = node;
        }
        self.tree = tree;
        debug!(node = ?self.node, noop, "root updated");
        Ok(self.node)
    }

    /// Removes the live tree.
    pub fn unmount(self, cx: &mut TreeCtx<H>) -> Result<(), H::Error> {
        Patch::Remove.apply(cx, self.node)?;
        debug!(node = ?self.node, "root unmounted");
        Ok(())
    }

    /// The live root node.
    pub fn node(&self) -> H::Node {
        self.node
    }

    /// The description of the last render pass.
    pub fn tree(&self) -> &VNode {
        &self.tree
    }
}
