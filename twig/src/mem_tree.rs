//! In-memory live tree.
use crate::{
    attributes::Handler,
    debug_util::{dump_tree, DebugTreeNode},
    error::TreeError,
    host::Host,
};
use slotmap::{new_key_type, SlotMap};
use std::fmt::Write;
use tracing::trace;
use twig_common::{atom, Atom, Value};

new_key_type! {
    /// Handle to a node of a [`MemTree`].
    pub struct NodeId;
}

enum NodeData {
    Document,
    Element {
        kind: Atom,
        attributes: Vec<(Atom, Value)>,
        handlers: Vec<(Atom, Handler)>,
    },
    Text(String),
}

struct MemNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

impl MemNode {
    fn new(data: NodeData) -> MemNode {
        MemNode {
            parent: None,
            children: Vec::new(),
            data,
        }
    }
}

/// A live tree held in memory.
///
/// The tree has a document node at its root. Description trees are mounted by replacing a slot
/// (see [`MemTree::create_slot`]) with the materialized subtree, as a page would replace a
/// placeholder element.
pub struct MemTree {
    nodes: SlotMap<NodeId, MemNode>,
    document: NodeId,
}

impl Default for MemTree {
    fn default() -> Self {
        MemTree::new()
    }
}

impl MemTree {
    pub fn new() -> MemTree {
        let mut nodes = SlotMap::with_key();
        let document = nodes.insert(MemNode::new(NodeData::Document));
        MemTree { nodes, document }
    }

    /// The root of the tree.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Appends an empty placeholder element to the document and returns it.
    pub fn create_slot(&mut self) -> NodeId {
        let slot = self.nodes.insert(MemNode::new(NodeData::Element {
            kind: Atom::from("twig-slot"),
            attributes: Vec::new(),
            handlers: Vec::new(),
        }));
        self.nodes[slot].parent = Some(self.document);
        self.nodes[self.document].children.push(slot);
        slot
    }

    /// Number of live nodes, the document included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match self.nodes.get(node) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    pub fn kind(&self, node: NodeId) -> Option<&Atom> {
        match self.nodes.get(node)?.data {
            NodeData::Element { ref kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node)?.data {
            NodeData::Text(ref text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &Atom) -> Option<&Value> {
        match self.nodes.get(node)?.data {
            NodeData::Element { ref attributes, .. } => attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the handler bound to `event` on `node`.
    ///
    /// The handler is cloned out of the tree so that it can be invoked without holding a borrow of
    /// the tree: handlers typically end up mutating it.
    pub fn handler(&self, node: NodeId, event: &Atom) -> Option<Handler> {
        match self.nodes.get(node)?.data {
            NodeData::Element { ref handlers, .. } => {
                handlers.iter().find(|(e, _)| e == event).map(|(_, h)| h.clone())
            }
            _ => None,
        }
    }

    /// Finds the first element, in document order, whose `id` attribute is `id`.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        let mut stack = vec![self.document];
        while let Some(node) = stack.pop() {
            if self.attribute(node, &atom!("id")).and_then(Value::as_str) == Some(id) {
                return Some(node);
            }
            stack.extend(self.children(node).iter().rev());
        }
        None
    }

    /// Serializes the subtree rooted at `node` as markup. Handlers are not serialized.
    pub fn to_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.nodes.get(node) else {
            return;
        };
        match n.data {
            NodeData::Document => {
                for &child in &n.children {
                    self.write_markup(child, out);
                }
            }
            NodeData::Text(ref text) => out.push_str(text),
            NodeData::Element {
                ref kind,
                ref attributes,
                ..
            } => {
                let _ = write!(out, "<{}", kind);
                for (name, value) in attributes {
                    let _ = write!(out, " {}=\"{}\"", name, value);
                }
                out.push('>');
                for &child in &n.children {
                    self.write_markup(child, out);
                }
                let _ = write!(out, "</{}>", kind);
            }
        }
    }

    fn debug_node(&self, node: NodeId) -> DebugTreeNode {
        let n = &self.nodes[node];
        let label = match n.data {
            NodeData::Document => "#document".to_string(),
            NodeData::Text(ref text) => format!("{:?}", text),
            NodeData::Element {
                ref kind,
                ref attributes,
                ref handlers,
            } => {
                let mut label = kind.to_string();
                for (name, value) in attributes {
                    let _ = write!(label, " {}={:?}", name, value.to_string());
                }
                for (event, _) in handlers {
                    let _ = write!(label, " on:{}", event);
                }
                label
            }
        };
        DebugTreeNode {
            label,
            children: n.children.iter().map(|&c| self.debug_node(c)).collect(),
        }
    }

    /// Draws the whole tree, one node per line.
    pub fn dump(&self) -> String {
        dump_tree(&self.debug_node(self.document))
    }

    //----------------------------------------------------------------------------------------------

    fn node(&self, node: NodeId) -> Result<&MemNode, TreeError> {
        self.nodes.get(node).ok_or(TreeError::StaleNode(node))
    }

    fn element_data_mut(
        &mut self,
        node: NodeId,
    ) -> Result<(&mut Vec<(Atom, Value)>, &mut Vec<(Atom, Handler)>), TreeError> {
        match self.nodes.get_mut(node).ok_or(TreeError::StaleNode(node))?.data {
            NodeData::Element {
                ref mut attributes,
                ref mut handlers,
                ..
            } => Ok((attributes, handlers)),
            _ => Err(TreeError::NotAnElement(node)),
        }
    }

    /// Checks that `parent` can receive `child`.
    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.node(child)?;
        if let NodeData::Text(_) = self.node(parent)?.data {
            return Err(TreeError::NotAnElement(parent));
        }
        // `child` must not be `parent` or one of its ancestors
        let mut cur = Some(parent);
        while let Some(n) = cur {
            if n == child {
                return Err(TreeError::Cycle { child });
            }
            cur = self.nodes[n].parent;
        }
        Ok(())
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|&c| c != node);
        }
    }

    /// Frees a detached subtree.
    fn free(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if let Some(removed) = self.nodes.remove(n) {
                stack.extend(removed.children);
            }
        }
    }
}

impl Host for MemTree {
    type Node = NodeId;
    type Error = TreeError;

    fn create_element(&mut self, kind: &Atom) -> Result<NodeId, TreeError> {
        Ok(self.nodes.insert(MemNode::new(NodeData::Element {
            kind: kind.clone(),
            attributes: Vec::new(),
            handlers: Vec::new(),
        })))
    }

    fn create_text(&mut self, text: &str) -> Result<NodeId, TreeError> {
        Ok(self.nodes.insert(MemNode::new(NodeData::Text(text.to_string()))))
    }

    fn set_attribute(&mut self, node: NodeId, name: &Atom, value: &Value) -> Result<(), TreeError> {
        let (attributes, _) = self.element_data_mut(node)?;
        if let Some(slot) = attributes.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value.clone();
        } else {
            attributes.push((name.clone(), value.clone()));
        }
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &Atom) -> Result<(), TreeError> {
        let (attributes, _) = self.element_data_mut(node)?;
        attributes.retain(|(n, _)| n != name);
        Ok(())
    }

    fn set_handler(&mut self, node: NodeId, event: &Atom, handler: &Handler) -> Result<(), TreeError> {
        let (_, handlers) = self.element_data_mut(node)?;
        if let Some(slot) = handlers.iter_mut().find(|(e, _)| e == event) {
            slot.1 = handler.clone();
        } else {
            handlers.push((event.clone(), handler.clone()));
        }
        Ok(())
    }

    fn remove_handler(&mut self, node: NodeId, event: &Atom) -> Result<(), TreeError> {
        let (_, handlers) = self.element_data_mut(node)?;
        handlers.retain(|(e, _)| e != event);
        Ok(())
    }

    fn child_at(&self, parent: NodeId, index: usize) -> Result<NodeId, TreeError> {
        self.node(parent)?
            .children
            .get(index)
            .copied()
            .ok_or(TreeError::ChildOutOfBounds { parent, index })
    }

    fn child_count(&self, parent: NodeId) -> Result<usize, TreeError> {
        Ok(self.node(parent)?.children.len())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_insertion(parent, child)?;
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<(), TreeError> {
        self.check_insertion(parent, child)?;
        let already_child = self.nodes[child].parent == Some(parent);
        let len = self.nodes[parent].children.len() - usize::from(already_child);
        if index > len {
            return Err(TreeError::ChildOutOfBounds { parent, index });
        }
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.insert(index, child);
        Ok(())
    }

    fn replace(&mut self, old: NodeId, new: NodeId) -> Result<(), TreeError> {
        let parent = self.node(old)?.parent.ok_or(TreeError::Detached(old))?;
        if old == new {
            return Ok(());
        }
        self.check_insertion(parent, new)?;
        self.detach(new);
        let children = &mut self.nodes[parent].children;
        // `old` is still attached: detaching `new` can't have removed it
        if let Some(pos) = children.iter().position(|&c| c == old) {
            children[pos] = new;
        }
        self.nodes[new].parent = Some(parent);
        self.nodes[old].parent = None;
        trace!(?old, ?new, "replace");
        self.free(old);
        Ok(())
    }

    fn remove(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.node(node)?;
        if node == self.document {
            return Err(TreeError::Detached(node));
        }
        self.detach(node);
        self.free(node);
        Ok(())
    }
}
