//! Patches: the deferred edits computed by [`diff`](crate::diff).
//!
//! A patch is computed from two description trees alone. Applying it performs the edits on a live
//! node through a [`TreeCtx`], and returns the live node that now stands for the new description
//! (or nothing if the node was removed).
use crate::{attributes::AttrValue, context::TreeCtx, host::Host, instrument::TreeEvent, node::VNode};
use smallvec::SmallVec;
use tracing::trace;
use twig_common::Atom;

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Single attribute edit.
#[derive(Clone, Debug)]
pub enum AttrOp {
    /// Writes an attribute, or binds an event handler. If `switched` is set, the name was held by
    /// the other form (handler or plain value), which is cleared first.
    Set { name: Atom, value: AttrValue, switched: bool },
    /// Removes an attribute, or unbinds an event handler if `handler` is set.
    Remove { name: Atom, handler: bool },
}

/// Edits of the attributes of one element.
#[derive(Clone, Debug, Default)]
pub struct AttrPatch(SmallVec<[AttrOp; 4]>);

impl AttrPatch {
    pub fn new() -> AttrPatch {
        AttrPatch::default()
    }

    pub fn push(&mut self, op: AttrOp) {
        self.0.push(op);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ops(&self) -> &[AttrOp] {
        &self.0
    }

    /// Performs the edits on `node`, in order. Each edit counts as one attribute modification.
    pub fn apply<H: Host>(self, cx: &mut TreeCtx<H>, node: H::Node) -> Result<(), H::Error> {
        for op in self.0 {
            match op {
                AttrOp::Set { name, value, switched } => cx.write_attribute(node, &name, &value, switched)?,
                AttrOp::Remove { name, handler } => cx.remove_attribute(node, &name, handler)?,
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Rotation of a list of live children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    None,
    /// Moves the first child to the end, this many times.
    Left(usize),
    /// Moves the last child to the front, this many times.
    Right(usize),
}

impl Rotation {
    fn apply<H: Host>(self, cx: &mut TreeCtx<H>, parent: H::Node) -> Result<(), H::Error> {
        let count = cx.host.child_count(parent)?;
        if count == 0 {
            return Ok(());
        }
        match self {
            Rotation::None => {}
            Rotation::Left(d) => {
                for _ in 0..d {
                    let first = cx.host.child_at(parent, 0)?;
                    cx.host.append_child(parent, first)?;
                    cx.record(TreeEvent::NodeMoved);
                }
            }
            Rotation::Right(d) => {
                for _ in 0..d {
                    let last = cx.host.child_at(parent, count - 1)?;
                    cx.host.insert_child(parent, 0, last)?;
                    cx.record(TreeEvent::NodeMoved);
                }
            }
        }
        Ok(())
    }
}

/// Edits of the children of one element.
#[derive(Clone, Debug)]
pub enum ChildrenPatch {
    /// One patch per old child, applied to the live child at the same position, then new children
    /// appended at the end.
    Positional { patches: Vec<Patch>, appends: Vec<VNode> },
    /// A rotation of the live children, followed by one patch per live child, identified by its
    /// position after the rotation.
    Reorder {
        rotation: Rotation,
        patches: Vec<(usize, Patch)>,
    },
}

impl Default for ChildrenPatch {
    fn default() -> Self {
        ChildrenPatch::Positional {
            patches: Vec::new(),
            appends: Vec::new(),
        }
    }
}

impl ChildrenPatch {
    /// Whether applying this patch would leave the live children untouched.
    pub fn is_noop(&self) -> bool {
        match self {
            ChildrenPatch::Positional { patches, appends } => appends.is_empty() && patches.iter().all(Patch::is_noop),
            ChildrenPatch::Reorder { rotation, patches } => {
                *rotation == Rotation::None && patches.iter().all(|(_, p)| p.is_noop())
            }
        }
    }

    pub fn apply<H: Host>(self, cx: &mut TreeCtx<H>, parent: H::Node) -> Result<(), H::Error> {
        match self {
            ChildrenPatch::Positional { patches, appends } => {
                // Removals shift the children that follow: go from the back so that the indices of
                // the children still to be patched don't move.
                for (index, patch) in patches.into_iter().enumerate().rev() {
                    if patch.is_noop() {
                        continue;
                    }
                    let child = cx.host.child_at(parent, index)?;
                    patch.apply(cx, child)?;
                }
                for node in appends {
                    let child = cx.materialize(&node)?;
                    cx.host.append_child(parent, child)?;
                    cx.record(TreeEvent::NodeMounted);
                }
            }
            ChildrenPatch::Reorder { rotation, patches } => {
                trace!(?rotation, "rotate children");
                rotation.apply(cx, parent)?;
                for (index, patch) in patches {
                    if patch.is_noop() {
                        continue;
                    }
                    let child = cx.host.child_at(parent, index)?;
                    patch.apply(cx, child)?;
                }
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Edit turning the live counterpart of an old description node into that of a new one.
#[derive(Clone, Debug, Default)]
pub enum Patch {
    /// Nothing to do.
    #[default]
    Keep,
    /// Materializes the node and mounts it in place of the given live node.
    Insert(VNode),
    /// Materializes the node and mounts it in place of the given live node, discarding it.
    Replace(VNode),
    /// Removes the given live node.
    Remove,
    /// Same kind of element: edits attributes and children in place.
    Update {
        attributes: AttrPatch,
        children: ChildrenPatch,
    },
}

impl Patch {
    /// Whether applying this patch would leave the live node untouched.
    pub fn is_noop(&self) -> bool {
        match self {
            Patch::Keep => true,
            Patch::Update { attributes, children } => attributes.is_empty() && children.is_noop(),
            _ => false,
        }
    }

    /// Applies the patch to `node`.
    ///
    /// Returns the live node standing for the new description, which is `node` itself unless it was
    /// replaced, or `None` if it was removed. Host errors are returned as is; the live tree may then
    /// be partially patched.
    pub fn apply<H: Host>(self, cx: &mut TreeCtx<H>, node: H::Node) -> Result<Option<H::Node>, H::Error> {
        match self {
            Patch::Keep => Ok(Some(node)),
            Patch::Insert(vnode) | Patch::Replace(vnode) => {
                let live = cx.materialize(&vnode)?;
                if let Err(err) = cx.mount(live, node) {
                    // not reachable from the live tree anymore
                    let _ = cx.host.remove(live);
                    return Err(err);
                }
                Ok(Some(live))
            }
            Patch::Remove => {
                trace!(?node, "remove");
                cx.host.remove(node)?;
                cx.record(TreeEvent::NodeDeleted);
                Ok(None)
            }
            Patch::Update { attributes, children } => {
                attributes.apply(cx, node)?;
                children.apply(cx, node)?;
                Ok(Some(node))
            }
        }
    }
}
