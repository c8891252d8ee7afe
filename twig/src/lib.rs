//! Reconciliation of declarative description trees with a host-managed live tree.
//!
//! Every render pass builds a fresh, immutable description tree ([`VNode`]). [`diff`] compares it
//! with the tree of the previous pass and produces a [`Patch`], which is then applied to the live
//! tree through the [`Host`] trait. Mutations are reported to an [`Instrument`] sink.
//!
//! [`Root`] bundles the cycle for a tree mounted once and updated many times. [`MemTree`] is an
//! in-memory host, used by the tests and the demos.

// public modules
pub mod host;
pub mod instrument;
pub mod patch;

// internal modules
mod attributes;
mod context;
mod debug_util;
mod diff;
mod error;
mod materialize;
mod mem_tree;
mod node;
mod root;

// public exports
pub use attributes::{AttrValue, Attributes, Handler};
pub use context::TreeCtx;
pub use diff::{diff, diff_with, validate_keys, DiffOptions, KeyCheck};
pub use error::{KeyError, TreeError};
pub use host::Host;
pub use instrument::{Counters, Instrument, TreeEvent};
pub use materialize::materialize;
pub use mem_tree::{MemTree, NodeId};
pub use node::{make_node, Deferred, Element, Key, RenderFlags, VNode};
pub use patch::{AttrOp, AttrPatch, ChildrenPatch, Patch, Rotation};
pub use root::Root;

// common reexports
pub use twig_common::{atom, Atom, Data, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    /// Mounts `old`, then applies `diff(old, new)` and checks that the live tree matches `new`.
    /// Returns the counters of the update only.
    fn update(old: VNode, new: VNode) -> Counters {
        let mut tree = MemTree::new();
        let slot = tree.create_slot();
        let mut root = Root::mount(&mut TreeCtx::new(&mut tree, &mut ()), slot, old).unwrap();

        let mut counters = Counters::new();
        let live = root.update(&mut TreeCtx::new(&mut tree, &mut counters), new.clone()).unwrap();

        let mut expected = MemTree::new();
        let expected_live = materialize(&mut TreeCtx::new(&mut expected, &mut ()), &new).unwrap();
        assert_eq!(tree.to_markup(live), expected.to_markup(expected_live));
        assert_eq!(tree.parent(live), Some(tree.document()));
        counters
    }

    fn keyed_list(keys: &[&str], flags: RenderFlags) -> VNode {
        Element::new("ul")
            .flags(flags)
            .children(keys.iter().map(|&k| Element::new("li").key(k).attr("class", "item").child(k)))
            .into()
    }

    fn page(title: &str) -> VNode {
        Element::new("div")
            .attr("id", "app")
            .child(Element::new("h1").child(title.to_string()))
            .child(keyed_list(&["a", "b", "c"], RenderFlags::REORDER))
            .into()
    }

    #[test]
    fn idempotence() {
        let counters = update(page("Gallery"), page("Gallery"));
        assert!(counters.is_zero(), "{}", counters);
    }

    #[test]
    fn text_replacement() {
        let counters = update("a".into(), "b".into());
        assert_eq!(counters.created, 1);
        assert_eq!(counters.mounted, 1);
        assert_eq!(counters.attributes_modified, 0);
        assert_eq!(counters.deleted, 0);
    }

    #[test]
    fn kind_mismatch_replaces() {
        let old: VNode = Element::new("img").attr("src", "a.png").into();
        let new: VNode = Element::new("div").attr("src", "a.png").into();
        let counters = update(old, new);
        assert_eq!(counters.created, 1);
        assert_eq!(counters.mounted, 1);
        // the attribute is written on the new node, not patched
        assert_eq!(counters.attributes_modified, 1);
    }

    #[test]
    fn attribute_diff_exactness() {
        let old: VNode = Element::new("p").attr("id", "x").attr("class", "a").into();
        let new: VNode = Element::new("p").attr("id", "x").attr("class", "b").attr("title", "t").into();
        let counters = update(old, new);
        assert_eq!(counters.attributes_modified, 2);
        assert_eq!(counters.created + counters.mounted + counters.deleted + counters.moved, 0);
    }

    #[test]
    fn block_reorder() {
        let old = keyed_list(&["k1", "k2", "k3", "k4", "k5"], RenderFlags::REORDER);
        let new = keyed_list(&["k2", "k3", "k4", "k5", "k1"], RenderFlags::REORDER);
        let counters = update(old, new);
        assert_eq!(
            counters,
            Counters {
                moved: 1,
                ..Counters::default()
            }
        );
    }

    #[test]
    fn reorder_without_flag_patches_by_position() {
        let old = keyed_list(&["k1", "k2", "k3"], RenderFlags::NORMAL);
        let new = keyed_list(&["k2", "k3", "k1"], RenderFlags::NORMAL);
        let counters = update(old, new);
        assert_eq!(counters.moved, 0);
        // one text replacement per item
        assert_eq!(counters.created, 3);
        assert_eq!(counters.mounted, 3);
    }

    #[test]
    fn growth_and_shrink() {
        let short = keyed_list(&["a", "b", "c"], RenderFlags::REORDER);
        let long = keyed_list(&["a", "b", "c", "d", "e"], RenderFlags::REORDER);

        let counters = update(short.clone(), long.clone());
        assert_eq!(counters.mounted, 2);
        assert_eq!(counters.created, 4);
        assert_eq!(counters.attributes_modified, 2);
        assert_eq!(counters.moved, 0);

        let counters = update(long, short);
        assert_eq!(counters.deleted, 2);
        assert_eq!(counters.created + counters.mounted + counters.moved, 0);
    }

    #[test]
    fn handlers_are_rebound() {
        let clicks = Rc::new(Cell::new(0));
        let button = |step: i32| -> VNode {
            let clicks = clicks.clone();
            Element::new("button")
                .attr("id", "add")
                .on("click", move || clicks.set(clicks.get() + step))
                .child("Add")
                .into()
        };

        let mut tree = MemTree::new();
        let slot = tree.create_slot();
        let mut root = Root::mount(&mut TreeCtx::new(&mut tree, &mut ()), slot, button(1)).unwrap();
        let mut counters = Counters::new();
        let live = root.update(&mut TreeCtx::new(&mut tree, &mut counters), button(10)).unwrap();
        assert_eq!(counters.attributes_modified, 1);

        tree.handler(live, &atom!("click")).unwrap().call();
        assert_eq!(clicks.get(), 10);
    }

    #[test]
    fn root_replacement_and_unmount() {
        let mut tree = MemTree::new();
        let slot = tree.create_slot();
        let mut root = Root::mount(&mut TreeCtx::new(&mut tree, &mut ()), slot, "loading".into()).unwrap();
        let first = root.node();
        let second = root.update(&mut TreeCtx::new(&mut tree, &mut ()), page("Gallery")).unwrap();
        assert_ne!(first, second);
        assert!(!tree.contains(first));
        assert_eq!(tree.find_by_id("app"), Some(second));

        let mut counters = Counters::new();
        root.unmount(&mut TreeCtx::new(&mut tree, &mut counters)).unwrap();
        assert_eq!(counters.deleted, 1);
        assert!(tree.is_empty());
    }

    #[test]
    fn host_errors_propagate() {
        let mut tree = MemTree::new();
        let detached = tree.create_text("orphan").unwrap();
        let result = diff(Some(&"orphan".into()), Some(&"other".into())).apply(&mut TreeCtx::new(&mut tree, &mut ()), detached);
        assert_eq!(result, Err(TreeError::Detached(detached)));
        // the replacement built before the failure is discarded
        assert_eq!(tree.len(), 2);
        assert!(tree.contains(detached));
    }

    #[test]
    fn value_to_handler_is_one_modification() {
        let mut tree = MemTree::new();
        let slot = tree.create_slot();
        let old: VNode = Element::new("button").attr("click", "noop").child("Add").into();
        let mut root = Root::mount(&mut TreeCtx::new(&mut tree, &mut ()), slot, old).unwrap();

        let mut counters = Counters::new();
        let new: VNode = Element::new("button").on("click", || {}).child("Add").into();
        let live = root.update(&mut TreeCtx::new(&mut tree, &mut counters), new).unwrap();
        assert_eq!(counters.attributes_modified, 1);
        assert!(tree.attribute(live, &atom!("click")).is_none());
        assert!(tree.handler(live, &atom!("click")).is_some());

        let mut counters = Counters::new();
        let back: VNode = Element::new("button").attr("click", "noop").child("Add").into();
        let live = root.update(&mut TreeCtx::new(&mut tree, &mut counters), back).unwrap();
        assert_eq!(counters.attributes_modified, 1);
        assert!(tree.handler(live, &atom!("click")).is_none());
        assert_eq!(tree.attribute(live, &atom!("click")), Some(&Value::from("noop")));
    }

    #[test]
    fn fallback_to_positional() {
        let old = keyed_list(&["a", "a", "b"], RenderFlags::REORDER);
        let new = keyed_list(&["b", "a", "a"], RenderFlags::REORDER);
        let options = DiffOptions::new().key_check(KeyCheck::Fallback);
        assert!(matches!(
            diff_with(Some(&old), Some(&new), &options),
            Patch::Update {
                children: ChildrenPatch::Positional { .. },
                ..
            }
        ));
    }
}
