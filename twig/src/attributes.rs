//! Element attributes.
use smallvec::SmallVec;
use std::{fmt, rc::Rc};
use twig_common::{Atom, Data, Value};

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Event handler bound to a live node.
///
/// Two handlers are the same only if they are clones of each other: rebuilding a closure on every
/// render produces a new handler, which is re-bound on the live node.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn()>);

impl Handler {
    pub fn new(f: impl Fn() + 'static) -> Handler {
        Handler(Rc::new(f))
    }

    /// Invokes the handler.
    pub fn call(&self) {
        (self.0)()
    }
}

impl Data for Handler {
    fn same(&self, other: &Self) -> bool {
        self.0.same(&other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Value of an attribute: either a plain value, written as a host attribute, or an event handler,
/// bound as a host event listener.
#[derive(Clone, Debug)]
pub enum AttrValue {
    Value(Value),
    Handler(Handler),
}

impl AttrValue {
    pub fn is_handler(&self) -> bool {
        matches!(self, AttrValue::Handler(_))
    }
}

impl Data for AttrValue {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrValue::Value(a), AttrValue::Value(b)) => a.same(b),
            (AttrValue::Handler(a), AttrValue::Handler(b)) => a.same(b),
            _ => false,
        }
    }
}

macro_rules! impl_attr_value_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AttrValue {
                fn from(v: $t) -> Self {
                    AttrValue::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_attr_value_from!(bool, i32, i64, u32, usize, f64, &str, String, Value);

impl From<Handler> for AttrValue {
    fn from(h: Handler) -> Self {
        AttrValue::Handler(h)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Attributes of an element, in insertion order.
///
/// Elements rarely have more than a handful of attributes, so this is a flat list with linear lookup.
#[derive(Clone, Default)]
pub struct Attributes(SmallVec<[(Atom, AttrValue); 4]>);

impl Attributes {
    pub fn new() -> Attributes {
        Attributes(SmallVec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sets an attribute, returning the previous value if there was one.
    ///
    /// Replacing a value keeps the position of the attribute.
    pub fn insert(&mut self, name: impl Into<Atom>, value: impl Into<AttrValue>) -> Option<AttrValue> {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(std::mem::replace(&mut slot.1, value))
        } else {
            self.0.push((name, value));
            None
        }
    }

    pub fn get(&self, name: &Atom) -> Option<&AttrValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &Atom) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &Atom) -> Option<AttrValue> {
        let pos = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Atom, &AttrValue)> + '_ {
        self.0.iter().map(|(n, v)| (n, v))
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<Atom>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twig_common::atom;

    #[test]
    fn insert_replaces_in_place() {
        let mut attrs: Attributes = [("id", "x"), ("class", "a")].into_iter().collect();
        let prev = attrs.insert(atom!("id"), "y");
        assert!(matches!(prev, Some(AttrValue::Value(Value::Str(ref s))) if s == "x"));
        let names: Vec<_> = attrs.iter().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, ["id", "class"]);
    }

    #[test]
    fn handlers_compare_by_identity() {
        let h = Handler::new(|| {});
        let a = AttrValue::from(h.clone());
        let b = AttrValue::from(h);
        let c = AttrValue::from(Handler::new(|| {}));
        assert!(a.same(&b));
        assert!(!a.same(&c));
        assert!(!a.same(&AttrValue::from("click")));
    }

    #[test]
    fn remove_and_lookup() {
        let mut attrs = Attributes::new();
        attrs.insert("title", "t");
        assert!(attrs.contains(&atom!("title")));
        assert!(attrs.remove(&atom!("title")).is_some());
        assert!(attrs.is_empty());
        assert!(attrs.remove(&atom!("title")).is_none());
    }
}
