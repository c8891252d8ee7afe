//! Creation of live subtrees from description nodes.
use crate::{context::TreeCtx, host::Host, instrument::TreeEvent, node::VNode};

/// Creates the live counterpart of `node` and of all its descendants.
///
/// Records one `NodeCreated` per live node and one `AttributeModified` per attribute or handler
/// written. The returned subtree is detached: mounting it is up to the caller.
pub fn materialize<H: Host>(cx: &mut TreeCtx<H>, node: &VNode) -> Result<H::Node, H::Error> {
    match node {
        VNode::Deferred(deferred) => materialize(cx, deferred.get()),
        VNode::Text(text) => {
            let live = cx.host.create_text(text)?;
            cx.record(TreeEvent::NodeCreated);
            Ok(live)
        }
        VNode::Element(element) => {
            let live = cx.host.create_element(&element.kind)?;
            cx.record(TreeEvent::NodeCreated);
            // event bindings first, then plain attributes
            let (handlers, plain): (Vec<_>, Vec<_>) = element.attributes.iter().partition(|(_, v)| v.is_handler());
            for (name, value) in handlers.into_iter().chain(plain) {
                cx.write_attribute(live, name, value, false)?;
            }
            for child in &element.children {
                let live_child = materialize(cx, child)?;
                cx.host.append_child(live, live_child)?;
            }
            Ok(live)
        }
    }
}
