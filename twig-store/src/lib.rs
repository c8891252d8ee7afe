//! Observable application state.
mod store;

pub use store::{State, Store, WeakStore};
