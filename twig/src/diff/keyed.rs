//! Keyed block-reorder differ.
//!
//! Finds one block of children that kept its relative order, rotates the live children so that
//! the block lands at its new position, then diffs the children pairwise. This handles the common
//! cases (an item moved from one end of the list to the other, a carousel shifting by a few items)
//! with a handful of moves, without attempting a general minimal reordering.
use super::{diff_with, DiffOptions, KeyCheck};
use crate::{
    error::KeyError,
    node::VNode,
    patch::{ChildrenPatch, Rotation},
};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A block of children appearing in the same order in both sequences.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Run {
    pub old_start: usize,
    pub new_start: usize,
    pub len: usize,
}

impl Run {
    /// Rotation of the old sequence that brings the block to its position in the new one.
    fn rotation(&self) -> Rotation {
        if self.len == 0 || self.old_start == self.new_start {
            Rotation::None
        } else if self.old_start > self.new_start {
            Rotation::Left(self.old_start - self.new_start)
        } else {
            Rotation::Right(self.new_start - self.old_start)
        }
    }
}

/// Finds the longest run of keys of `old` that reappears in order in `new`.
///
/// For each start position in `old`, `new` is scanned once: every key equal to the next expected
/// key extends the current run, any other key resets it. Of several longest runs, the one with the
/// lowest start in `old` is returned.
pub(crate) fn longest_run(old: &[VNode], new: &[VNode]) -> Run {
    let mut best = Run::default();
    for i in 0..old.len() {
        let mut new_start = 0;
        let mut len = 0;
        for (j, child) in new.iter().enumerate() {
            if i + len >= old.len() {
                break;
            }
            if old[i + len].key() == child.key() {
                if len == 0 {
                    new_start = j;
                }
                len += 1;
                if len > best.len {
                    best = Run {
                        old_start: i,
                        new_start,
                        len,
                    };
                }
            } else {
                len = 0;
            }
        }
    }
    best
}

/// Checks that every child has a key, and that no key is used twice.
pub fn validate_keys(children: &[VNode]) -> Result<(), KeyError> {
    let mut seen = HashSet::with_capacity(children.len());
    for (index, child) in children.iter().enumerate() {
        let key = child.key().ok_or(KeyError::Missing { index })?;
        if !seen.insert(key) {
            return Err(KeyError::Duplicate { key: key.clone() });
        }
    }
    Ok(())
}

/// Diffs two sequences of keyed children of the same length.
///
/// Returns `None` if the keys are invalid and the options ask to fall back to positional diffing.
pub(crate) fn diff_keyed(old: &[VNode], new: &[VNode], options: &DiffOptions) -> Option<ChildrenPatch> {
    if options.key_check != KeyCheck::Ignore {
        for (side, children) in [("old", old), ("new", new)] {
            if let Err(err) = validate_keys(children) {
                warn!(%err, side, "invalid keys in reordered children");
                if options.key_check == KeyCheck::Fallback {
                    return None;
                }
            }
        }
    }

    let n = old.len();
    let run = longest_run(old, new);
    let rotation = run.rotation();
    debug!(?run, ?rotation, "keyed children");

    // After the rotation, the live child at position `(new_start + k) % n` is the one built from
    // `old[(old_start + k) % n]`.
    let patches = (0..n)
        .map(|k| {
            let from = (run.old_start + k) % n;
            let to = (run.new_start + k) % n;
            (to, diff_with(Some(&old[from]), Some(&new[to]), options))
        })
        .collect();
    Some(ChildrenPatch::Reorder { rotation, patches })
}
