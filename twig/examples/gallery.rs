//! A carousel gallery, rendered into an in-memory tree.
//!
//! Buttons are "clicked" by calling the handlers bound on the live tree. Each click updates the
//! store, which re-renders the application and logs the mutations performed on the live tree.
//!
//! Run with `RUST_LOG=debug` to see each reconciliation step.
use anyhow::anyhow;
use std::{cell::RefCell, rc::Rc};
use tracing::{error, info, warn};
use twig::{
    atom, make_node, Attributes, Counters, DiffOptions, Element, KeyCheck, MemTree, RenderFlags, Root, TreeCtx, VNode,
};
use twig_store::{Store, WeakStore};

const MAX_IMAGES: i64 = 8;

fn title(text: &str, color: Option<&str>) -> VNode {
    Element::new("h1")
        .attr("id", "title")
        .attr("style", format!("color: {}", color.unwrap_or("blue")))
        .child(text)
        .into()
}

fn button(id: &str, text: &str, disabled: bool, on_click: impl Fn() + 'static) -> VNode {
    let mut button = Element::new("button").attr("id", id).on("click", on_click);
    if disabled {
        button = button.attr("disabled", true);
    }
    button.child(text).into()
}

fn image(index: i64) -> VNode {
    let attributes: Attributes = [
        ("key", format!("image-{}", index)),
        ("src", format!("https://picsum.photos/200/200?id={}", index)),
    ]
    .into_iter()
    .collect();
    make_node("img", attributes, Vec::<VNode>::new(), RenderFlags::NORMAL)
}

/// Updates the store if it's still alive.
fn update(store: &WeakStore, f: impl FnOnce(&Store)) {
    if let Some(store) = store.upgrade() {
        f(&store)
    }
}

fn gallery(store: &Store, num_images: i64) -> VNode {
    let position = store.get("position").and_then(|v| v.as_int()).unwrap_or(0);
    let weak = store.downgrade();
    let back = move || {
        update(&weak, |s| {
            let position = s.get("position").and_then(|v| v.as_int()).unwrap_or(0);
            s.set_state([("position", position - 1)])
        })
    };
    let weak = store.downgrade();
    let next = move || {
        update(&weak, |s| {
            let position = s.get("position").and_then(|v| v.as_int()).unwrap_or(0);
            s.set_state([("position", position + 1)])
        })
    };

    // rotate images based on position
    let images = (0..num_images).map(|i| image((i + position).rem_euclid(num_images) + 1));

    Element::new("div")
        .attr("id", "gallery")
        .attr("style", "display: flex; justify-content: space-around;")
        .child(button("back", "<", false, back))
        .child(
            Element::new("div")
                .attr("id", "container")
                .attr("style", "display: flex; gap: 10px;")
                .flags(RenderFlags::NORMAL | RenderFlags::REORDER)
                .children(images),
        )
        .child(button("next", ">", false, next))
        .into()
}

fn app(store: &Store) -> VNode {
    let num_images = store.get("numImages").and_then(|v| v.as_int()).unwrap_or(3);
    let weak = store.downgrade();
    let add = move || update(&weak, |s| s.set_state([("numImages", num_images + 1), ("position", 0)]));
    let weak = store.downgrade();
    let remove = move || update(&weak, |s| s.set_state([("numImages", num_images - 1), ("position", 0)]));

    Element::new("div")
        .attr("id", "app")
        .child(title("Gallery", None))
        .child(
            Element::new("div")
                .attr("id", "controls")
                .child(button("add", "Add 1 image", num_images >= MAX_IMAGES, add))
                .child(button("remove", "Remove 1 image", num_images <= 0, remove)),
        )
        // only built when the tree is materialized or compared
        .child({
            let store = store.clone();
            VNode::deferred(move || gallery(&store, num_images))
        })
        .into()
}

/// Simulates a click on the element with the given id.
fn click(tree: &RefCell<MemTree>, id: &str) -> anyhow::Result<()> {
    let handler = {
        let tree = tree.borrow();
        let node = tree.find_by_id(id).ok_or_else(|| anyhow!("no element with id `{}`", id))?;
        if tree.attribute(node, &atom!("disabled")).is_some() {
            warn!(id, "button is disabled");
            return Ok(());
        }
        tree.handler(node, &atom!("click"))
            .ok_or_else(|| anyhow!("`{}` has no click handler", id))?
    };
    info!(id, "click");
    // the tree is borrowed again by the re-render
    handler.call();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let store = Store::from_json(r#"{ "numImages": 3, "position": 0 }"#)?;
    let tree = Rc::new(RefCell::new(MemTree::new()));

    let mut counters = Counters::new();
    let root = {
        let mut tree = tree.borrow_mut();
        let slot = tree.create_slot();
        let options = DiffOptions::new().key_check(KeyCheck::Warn);
        Root::mount_with(&mut TreeCtx::new(&mut *tree, &mut counters), slot, app(&store), options)?
    };
    info!(num_images = 3, %counters, "initial render");
    let root = Rc::new(RefCell::new(root));

    store.add_listener({
        let store = store.downgrade();
        let tree = tree.clone();
        let root = root.clone();
        move || {
            let Some(store) = store.upgrade() else {
                return;
            };
            let mut counters = Counters::new();
            let mut tree = tree.borrow_mut();
            let result = root
                .borrow_mut()
                .update(&mut TreeCtx::new(&mut *tree, &mut counters), app(&store));
            match result {
                Ok(_) => info!(num_images = ?store.get("numImages"), %counters, "re-render"),
                Err(err) => error!(%err, "re-render failed"),
            }
        }
    });

    for id in ["next", "next", "back", "add", "remove", "remove", "remove", "remove", "add"] {
        click(&tree, id)?;
    }

    println!("{}", tree.borrow().dump());
    println!("{}", tree.borrow().to_markup(root.borrow().node()));

    store.dispose();
    Ok(())
}
