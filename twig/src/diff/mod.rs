//! Computation of patches between description trees.
//!
//! Diffing only looks at description nodes: it never touches the live tree. The resulting [`Patch`]
//! is applied later, against the live node that was produced from the old description.
mod attributes;
mod children;
mod keyed;

pub use keyed::validate_keys;

use crate::{node::VNode, patch::Patch};
use std::rc::Rc;

////////////////////////////////////////////////////////////////////////////////////////////////////

/// What the keyed differ does when reordered children don't all carry unique keys.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyCheck {
    /// Don't check. Results are unspecified if the keys are invalid.
    #[default]
    Ignore,
    /// Log a warning, then proceed with the keyed differ anyway.
    Warn,
    /// Log a warning, then reconcile the children by position instead.
    Fallback,
}

/// Options of [`diff_with`].
#[derive(Clone, Debug, Default)]
pub struct DiffOptions {
    pub key_check: KeyCheck,
}

impl DiffOptions {
    pub fn new() -> DiffOptions {
        DiffOptions::default()
    }

    #[must_use]
    pub fn key_check(mut self, key_check: KeyCheck) -> Self {
        self.key_check = key_check;
        self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Computes the patch turning the live counterpart of `old` into that of `new`, with the default
/// options.
///
/// `None` on either side stands for an absent node: `(None, Some)` is an insertion and `(Some, None)`
/// a removal.
pub fn diff(old: Option<&VNode>, new: Option<&VNode>) -> Patch {
    diff_with(old, new, &DiffOptions::default())
}

/// Computes the patch turning the live counterpart of `old` into that of `new`.
pub fn diff_with(old: Option<&VNode>, new: Option<&VNode>, options: &DiffOptions) -> Patch {
    let (old, new) = match (old, new) {
        (None, None) => return Patch::Keep,
        (None, Some(new)) => return Patch::Insert(new.clone()),
        (Some(_), None) => return Patch::Remove,
        (Some(old), Some(new)) => (old, new),
    };

    match (old.resolve(), new.resolve()) {
        (VNode::Text(a), VNode::Text(b)) => {
            if a == b {
                Patch::Keep
            } else {
                Patch::Replace(new.clone())
            }
        }
        (VNode::Element(a), VNode::Element(b)) => {
            if a.kind != b.kind {
                return Patch::Replace(new.clone());
            }
            if Rc::ptr_eq(a, b) {
                return Patch::Keep;
            }
            let attributes = attributes::diff_attributes(&a.attributes, &b.attributes);
            let children = children::diff_children(&a.children, &b.children, b.flags, options);
            if attributes.is_empty() && children.is_noop() {
                Patch::Keep
            } else {
                Patch::Update { attributes, children }
            }
        }
        // text vs. element
        _ => Patch::Replace(new.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChildrenPatch, Element, RenderFlags};

    #[test]
    fn classification() {
        let text_a = VNode::from("a");
        let text_b = VNode::from("b");
        let img: VNode = Element::new("img").attr("src", "x.png").into();
        let div: VNode = Element::new("div").attr("src", "x.png").into();

        assert!(matches!(diff(None, Some(&text_a)), Patch::Insert(_)));
        assert!(matches!(diff(Some(&text_a), None), Patch::Remove));
        assert!(matches!(diff(Some(&text_a), Some(&VNode::from("a"))), Patch::Keep));
        assert!(matches!(diff(Some(&text_a), Some(&text_b)), Patch::Replace(_)));
        assert!(matches!(diff(Some(&text_a), Some(&div)), Patch::Replace(_)));
        assert!(matches!(diff(Some(&div), Some(&text_a)), Patch::Replace(_)));
        assert!(matches!(diff(Some(&img), Some(&div)), Patch::Replace(ref n) if &*n.as_element().unwrap().kind == "div"));
    }

    #[test]
    fn same_kind_updates_in_place() {
        let old: VNode = Element::new("p").attr("class", "a").child("x").into();
        let new: VNode = Element::new("p").attr("class", "b").child("x").into();
        match diff(Some(&old), Some(&new)) {
            Patch::Update { attributes, children } => {
                assert_eq!(attributes.len(), 1);
                assert!(children.is_noop());
            }
            other => panic!("unexpected patch: {:?}", other),
        }
    }

    #[test]
    fn equal_structures_are_kept() {
        let build = || -> VNode {
            Element::new("ul")
                .flags(RenderFlags::REORDER)
                .children(["a", "b"].map(|k| Element::new("li").key(k).child(k)))
                .into()
        };
        assert!(matches!(diff(Some(&build()), Some(&build())), Patch::Keep));
    }

    #[test]
    fn sees_through_deferred_nodes() {
        let old = VNode::deferred(|| Element::new("span").child("a").into());
        let new: VNode = Element::new("span").child("b").into();
        match diff(Some(&old), Some(&new)) {
            Patch::Update {
                children: ChildrenPatch::Positional { patches, appends },
                ..
            } => {
                assert!(matches!(patches[..], [Patch::Replace(_)]));
                assert!(appends.is_empty());
            }
            other => panic!("unexpected patch: {:?}", other),
        }
    }
}
