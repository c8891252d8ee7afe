use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    rc::{Rc, Weak},
};
use tracing::trace;
use twig_common::{Atom, Value};

/// Snapshot of the state of a store.
pub type State = imbl::HashMap<Atom, Value>;

type Listener = Rc<dyn Fn()>;

struct StoreInner {
    state: RefCell<State>,
    listeners: RefCell<Vec<Listener>>,
}

/// Application state, with change notification.
///
/// A store is a handle: clones share the same state and listeners. Listeners typically capture a
/// clone of the store to read the new state, which creates a reference cycle; call
/// [`Store::dispose`] to break it.
#[derive(Clone)]
pub struct Store(Rc<StoreInner>);

/// Weak handle to a [`Store`].
#[derive(Clone)]
pub struct WeakStore(Weak<StoreInner>);

impl WeakStore {
    pub fn upgrade(&self) -> Option<Store> {
        self.0.upgrade().map(Store)
    }
}

impl Store {
    /// Creates a store with the given initial entries.
    pub fn new<I, K, V>(initial: I) -> Store
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Atom>,
        V: Into<Value>,
    {
        let state = initial.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Store(Rc::new(StoreInner {
            state: RefCell::new(state),
            listeners: RefCell::new(Vec::new()),
        }))
    }

    /// Creates a store from a JSON object of scalar values.
    pub fn from_json(json: &str) -> Result<Store, serde_json::Error> {
        let initial: HashMap<String, Value> = serde_json::from_str(json)?;
        Ok(Store::new(initial))
    }

    /// Returns a snapshot of the current state. This is cheap: entries are shared with the store
    /// until either side is modified.
    pub fn get_state(&self) -> State {
        self.0.state.borrow().clone()
    }

    /// Returns the current value of one entry.
    pub fn get(&self, key: impl Into<Atom>) -> Option<Value> {
        self.0.state.borrow().get(&key.into()).cloned()
    }

    /// Merges `partial` into the state, then invokes every listener, in registration order.
    ///
    /// Entries of `partial` replace existing entries with the same key; other entries are left
    /// untouched. Listeners may call `set_state` again: the nested notification pass completes
    /// before the outer one resumes. Listeners added during a pass are invoked from the next one.
    pub fn set_state<I, K, V>(&self, partial: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Atom>,
        V: Into<Value>,
    {
        let partial: Vec<(Atom, Value)> = partial.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        {
            let mut state = self.0.state.borrow_mut();
            for (key, value) in partial {
                trace!(%key, %value, "set_state");
                state.insert(key, value);
            }
        }
        let listeners = self.0.listeners.borrow().clone();
        trace!(listeners = listeners.len(), "notifying listeners");
        for listener in listeners {
            listener();
        }
    }

    /// Registers a listener, invoked after every state change.
    pub fn add_listener(&self, listener: impl Fn() + 'static) {
        self.0.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.0.listeners.borrow().len()
    }

    /// Removes all listeners.
    pub fn dispose(&self) {
        let listeners = std::mem::take(&mut *self.0.listeners.borrow_mut());
        trace!(listeners = listeners.len(), "store disposed");
        // listeners may hold the last handles to other stores: drop them outside of the borrow
        drop(listeners);
    }

    pub fn downgrade(&self) -> WeakStore {
        WeakStore(Rc::downgrade(&self.0))
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new(Vec::<(Atom, Value)>::new())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.0.state.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use twig_common::{atom, Data};

    #[test]
    fn notification_order_and_merge() {
        let store = Store::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["A", "B"] {
            let log = log.clone();
            let s = store.clone();
            store.add_listener(move || log.borrow_mut().push((name, s.get("x"))));
        }

        store.set_state([("x", 1)]);
        assert_eq!(*log.borrow(), [("A", Some(Value::Int(1))), ("B", Some(Value::Int(1)))]);

        store.set_state([("y", 2)]);
        assert_eq!(store.get("x"), Some(Value::Int(1)));
        assert_eq!(store.get("y"), Some(Value::Int(2)));
        assert_eq!(log.borrow().len(), 4);
        store.dispose();
    }

    #[test]
    fn nested_updates_run_depth_first() {
        let store = Store::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let log = log.clone();
            let s = store.clone();
            store.add_listener(move || {
                let y = s.get("y");
                log.borrow_mut().push(format!("A{}", y.clone().unwrap_or_default()));
                if y.is_none() {
                    s.set_state([("y", 2)]);
                }
            });
        }
        {
            let log = log.clone();
            store.add_listener(move || log.borrow_mut().push("B".to_string()));
        }
        store.set_state([("x", 1)]);
        assert_eq!(*log.borrow(), ["A", "A2", "B", "B"]);
        store.dispose();
    }

    #[test]
    fn listeners_added_during_notification_wait_for_next_pass() {
        let store = Store::default();
        let late_calls = Rc::new(Cell::new(0));
        {
            let s = store.clone();
            let late_calls = late_calls.clone();
            store.add_listener(move || {
                let late_calls = late_calls.clone();
                s.add_listener(move || late_calls.set(late_calls.get() + 1));
            });
        }
        store.set_state([("x", 1)]);
        assert_eq!(late_calls.get(), 0);
        assert_eq!(store.listener_count(), 2);
        store.set_state([("x", 2)]);
        assert_eq!(late_calls.get(), 1);
        store.dispose();
    }

    #[test]
    fn dispose_breaks_cycles() {
        let store = Store::new([("position", 0)]);
        let weak = store.downgrade();
        {
            let s = store.clone();
            store.add_listener(move || {
                let _ = s.get("position");
            });
        }
        store.dispose();
        assert_eq!(store.listener_count(), 0);
        drop(store);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn snapshots() {
        let store = Store::new([("numImages", 1)]);
        let before = store.get_state();
        assert!(before.same(&store.get_state()));
        store.set_state([("position", 3)]);
        let after = store.get_state();
        assert!(!before.same(&after));
        assert_eq!(before.len(), 1);
        assert_eq!(after.get(&Atom::from("position")), Some(&Value::Int(3)));
        assert_eq!(after.get(&atom!("title")), None);
    }

    #[test]
    fn from_json() {
        let store = Store::from_json(r#"{ "numImages": 1, "position": 0, "title": "Gallery" }"#).unwrap();
        assert_eq!(store.get("numImages"), Some(Value::Int(1)));
        assert_eq!(store.get("title"), Some(Value::from("Gallery")));
        assert!(Store::from_json("[1, 2]").is_err());
    }
}
