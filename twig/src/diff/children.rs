use super::{diff_with, keyed, DiffOptions};
use crate::{
    node::{RenderFlags, VNode},
    patch::ChildrenPatch,
};

/// Computes the edits turning the children `old` into `new`.
///
/// Children are reordered only if `flags` (the flags of the new parent) request it and the number of
/// children is unchanged. Otherwise, they are reconciled by position.
pub(crate) fn diff_children(old: &[VNode], new: &[VNode], flags: RenderFlags, options: &DiffOptions) -> ChildrenPatch {
    if old.len() == new.len() && flags.contains(RenderFlags::REORDER) {
        if let Some(patch) = keyed::diff_keyed(old, new, options) {
            return patch;
        }
    }
    diff_positional(old, new, options)
}

/// Pairs children by index. Trailing old children are removed, trailing new children appended.
pub(crate) fn diff_positional(old: &[VNode], new: &[VNode], options: &DiffOptions) -> ChildrenPatch {
    let patches = old
        .iter()
        .enumerate()
        .map(|(i, child)| diff_with(Some(child), new.get(i), options))
        .collect();
    let appends = new.iter().skip(old.len()).cloned().collect();
    ChildrenPatch::Positional { patches, appends }
}
