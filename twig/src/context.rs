use crate::{
    attributes::AttrValue,
    host::Host,
    instrument::{Instrument, TreeEvent},
    materialize::materialize,
    node::VNode,
};
use tracing::trace;
use twig_common::Atom;

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Context passed to patches and to the materializer.
///
/// Bundles the live tree being mutated and the sink that receives every mutation.
pub struct TreeCtx<'a, H: Host> {
    pub host: &'a mut H,
    instrument: &'a mut dyn Instrument,
}

impl<'a, H: Host> TreeCtx<'a, H> {
    pub fn new(host: &'a mut H, instrument: &'a mut dyn Instrument) -> TreeCtx<'a, H> {
        TreeCtx { host, instrument }
    }

    pub fn record(&mut self, event: TreeEvent) {
        self.instrument.record(event);
    }

    /// Creates the live counterpart of a description subtree. The result is detached.
    pub fn materialize(&mut self, node: &VNode) -> Result<H::Node, H::Error> {
        materialize(self, node)
    }

    /// Installs `node` in place of `slot`.
    pub fn mount(&mut self, node: H::Node, slot: H::Node) -> Result<(), H::Error> {
        trace!(?node, ?slot, "mount");
        self.host.replace(slot, node)?;
        self.record(TreeEvent::NodeMounted);
        Ok(())
    }

    /// Writes an attribute, or binds an event handler.
    ///
    /// With `clear_other`, the handler (resp. plain attribute) of the same name is removed first.
    /// This is part of the same modification.
    pub(crate) fn write_attribute(
        &mut self,
        node: H::Node,
        name: &Atom,
        value: &AttrValue,
        clear_other: bool,
    ) -> Result<(), H::Error> {
        trace!(?node, %name, ?value, clear_other, "write attribute");
        match value {
            AttrValue::Value(v) => {
                if clear_other {
                    self.host.remove_handler(node, name)?;
                }
                self.host.set_attribute(node, name, v)?
            }
            AttrValue::Handler(h) => {
                if clear_other {
                    self.host.remove_attribute(node, name)?;
                }
                self.host.set_handler(node, name, h)?
            }
        }
        self.record(TreeEvent::AttributeModified);
        Ok(())
    }

    /// Removes an attribute, or unbinds an event handler.
    pub(crate) fn remove_attribute(&mut self, node: H::Node, name: &Atom, handler: bool) -> Result<(), H::Error> {
        trace!(?node, %name, handler, "remove attribute");
        if handler {
            self.host.remove_handler(node, name)?;
        } else {
            self.host.remove_attribute(node, name)?;
        }
        self.record(TreeEvent::AttributeModified);
        Ok(())
    }
}
