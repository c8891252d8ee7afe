//! Instrumentation of live tree mutations.
use std::fmt;
use tracing::trace;

/// Live tree mutations that are counted.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TreeEvent {
    /// A live node was created.
    NodeCreated,
    /// A materialized subtree was installed in the live tree.
    NodeMounted,
    /// A live node was removed.
    NodeDeleted,
    /// A live child was moved among its siblings.
    NodeMoved,
    /// An attribute or an event binding was written or removed.
    AttributeModified,
}

/// Receives the mutations performed while applying a patch.
pub trait Instrument {
    fn record(&mut self, event: TreeEvent);
}

/// Discards everything.
impl Instrument for () {
    fn record(&mut self, _event: TreeEvent) {}
}

/// Counts mutations per kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Counters {
    pub created: u64,
    pub mounted: u64,
    pub deleted: u64,
    pub moved: u64,
    pub attributes_modified: u64,
}

impl Counters {
    pub fn new() -> Counters {
        Counters::default()
    }

    /// Resets all counters to zero.
    pub fn reset(&mut self) {
        *self = Counters::default();
    }

    /// Returns the count for one kind of event.
    pub fn get(&self, event: TreeEvent) -> u64 {
        match event {
            TreeEvent::NodeCreated => self.created,
            TreeEvent::NodeMounted => self.mounted,
            TreeEvent::NodeDeleted => self.deleted,
            TreeEvent::NodeMoved => self.moved,
            TreeEvent::AttributeModified => self.attributes_modified,
        }
    }

    /// Whether nothing was recorded.
    pub fn is_zero(&self) -> bool {
        *self == Counters::default()
    }
}

impl Instrument for Counters {
    fn record(&mut self, event: TreeEvent) {
        trace!(?event, "tree mutation");
        let counter = match event {
            TreeEvent::NodeCreated => &mut self.created,
            TreeEvent::NodeMounted => &mut self.mounted,
            TreeEvent::NodeDeleted => &mut self.deleted,
            TreeEvent::NodeMoved => &mut self.moved,
            TreeEvent::AttributeModified => &mut self.attributes_modified,
        };
        *counter += 1;
    }
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "created: {}, mounted: {}, deleted: {}, moved: {}, attributes modified: {}",
            self.created, self.mounted, self.deleted, self.moved, self.attributes_modified
        )
    }
}
