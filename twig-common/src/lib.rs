//! Basic types shared by twig crates.

pub mod atoms;
mod data;
mod value;

pub use crate::{atoms::Atom, data::Data, value::Value};

#[cfg(feature = "imbl")]
pub use imbl;
