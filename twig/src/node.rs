//! Description nodes.
//!
//! A description tree is an immutable value built fresh on every render pass. It is compared with
//! the tree of the previous pass by [`diff`](crate::diff) and thrown away after the next one.
use crate::attributes::{AttrValue, Attributes, Handler};
use bitflags::bitflags;
use once_cell::unsync::Lazy;
use std::{fmt, rc::Rc};
use twig_common::{atom, Atom, Value};

////////////////////////////////////////////////////////////////////////////////////////////////////

bitflags! {
    /// Selects how the children of an element are reconciled.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u32 {
        /// Children are reconciled by position.
        const NORMAL = (1 << 0);
        /// Children carry unique keys; when the number of children doesn't change, one block of
        /// children that kept its relative order is rotated into place instead of being rebuilt.
        const REORDER = (1 << 1);
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        RenderFlags::NORMAL
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Identifies an element among its siblings. Only used for reordering.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Key(Atom);

impl Key {
    pub fn new(key: impl Into<Atom>) -> Key {
        Key(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::new(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::new(s)
    }
}

impl From<u64> for Key {
    fn from(v: u64) -> Self {
        Key::new(v.to_string())
    }
}

impl From<usize> for Key {
    fn from(v: usize) -> Self {
        Key::new(v.to_string())
    }
}

impl From<i32> for Key {
    fn from(v: i32) -> Self {
        Key::new(v.to_string())
    }
}

impl From<&Value> for Key {
    fn from(v: &Value) -> Self {
        Key::new(v.to_string())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Element (non-text) description node.
#[derive(Clone)]
pub struct Element {
    pub kind: Atom,
    pub key: Option<Key>,
    pub attributes: Attributes,
    pub children: Vec<VNode>,
    pub flags: RenderFlags,
}

impl Element {
    /// Creates an element of the given kind, with no attributes and no children.
    pub fn new(kind: impl Into<Atom>) -> Element {
        Element {
            kind: kind.into(),
            key: None,
            attributes: Attributes::new(),
            children: Vec::new(),
            flags: RenderFlags::NORMAL,
        }
    }

    #[must_use]
    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets a plain attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<Atom>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name, AttrValue::Value(value.into()));
        self
    }

    /// Binds an event handler.
    #[must_use]
    pub fn on(mut self, event: impl Into<Atom>, handler: impl Fn() + 'static) -> Self {
        self.attributes.insert(event, Handler::new(handler));
        self
    }

    #[must_use]
    pub fn child(mut self, child: impl Into<VNode>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VNode>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: RenderFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = f.debug_struct("Element");
        s.field("kind", &self.kind);
        if let Some(ref key) = self.key {
            s.field("key", key);
        }
        s.field("attributes", &self.attributes)
            .field("children", &self.children)
            .field("flags", &self.flags)
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// A node produced on demand.
///
/// The producer runs at most once: a deferred node denotes the same subtree for every later
/// materialization or comparison.
#[derive(Clone)]
pub struct Deferred(Rc<Lazy<VNode, Box<dyn FnOnce() -> VNode>>>);

impl Deferred {
    pub fn new(producer: impl FnOnce() -> VNode + 'static) -> Deferred {
        let producer: Box<dyn FnOnce() -> VNode> = Box::new(producer);
        Deferred(Rc::new(Lazy::new(producer)))
    }

    /// Runs the producer if it hasn't run yet, and returns the produced node.
    pub fn get(&self) -> &VNode {
        Lazy::force(&self.0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Description node.
#[derive(Clone)]
pub enum VNode {
    /// Text leaf.
    Text(Rc<str>),
    /// Element with attributes and children.
    Element(Rc<Element>),
    /// Node built by a zero-argument producer.
    Deferred(Deferred),
}

impl VNode {
    pub fn text(text: impl Into<Rc<str>>) -> VNode {
        VNode::Text(text.into())
    }

    pub fn deferred(producer: impl FnOnce() -> VNode + 'static) -> VNode {
        VNode::Deferred(Deferred::new(producer))
    }

    /// Follows deferred nodes until a text leaf or an element is reached.
    pub fn resolve(&self) -> &VNode {
        match self {
            VNode::Deferred(d) => d.get().resolve(),
            other => other,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self.resolve() {
            VNode::Element(e) => Some(&**e),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self.resolve() {
            VNode::Text(t) => Some(&**t),
            _ => None,
        }
    }

    /// Returns the reordering key of this node. Text leaves have none.
    pub fn key(&self) -> Option<&Key> {
        self.as_element().and_then(|e| e.key.as_ref())
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VNode::Text(t) => write!(f, "{:?}", t),
            VNode::Element(e) => fmt::Debug::fmt(&**e, f),
            VNode::Deferred(d) => f.debug_tuple("Deferred").field(d.get()).finish(),
        }
    }
}

impl From<Element> for VNode {
    fn from(e: Element) -> Self {
        VNode::Element(Rc::new(e))
    }
}

impl From<&str> for VNode {
    fn from(s: &str) -> Self {
        VNode::Text(s.into())
    }
}

impl From<String> for VNode {
    fn from(s: String) -> Self {
        VNode::Text(s.into())
    }
}

impl From<Deferred> for VNode {
    fn from(d: Deferred) -> Self {
        VNode::Deferred(d)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Creates an element description node.
///
/// A plain `key` entry in `attributes` becomes the reordering key of the node and is not kept as an
/// attribute.
pub fn make_node<I>(kind: impl Into<Atom>, mut attributes: Attributes, children: I, flags: RenderFlags) -> VNode
where
    I: IntoIterator,
    I::Item: Into<VNode>,
{
    let key = match attributes.get(&atom!("key")) {
        Some(AttrValue::Value(v)) => Some(Key::from(v)),
        _ => None,
    };
    if key.is_some() {
        attributes.remove(&atom!("key"));
    }
    VNode::from(Element {
        kind: kind.into(),
        key,
        attributes,
        children: children.into_iter().map(Into::into).collect(),
        flags,
    })
}
