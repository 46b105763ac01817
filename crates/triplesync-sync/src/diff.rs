//! Statement set difference.
//!
//! Desired sets are regenerated from stable inputs (statement ids, content
//! hashes), so unchanged content reproduces identical triples and a no-op
//! sync diffs to two empty sets without any semantic comparison.

use std::collections::BTreeSet;

use triplesync_core::Statement;

/// Changes needed to turn the current state into the desired one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    pub to_add: BTreeSet<Statement>,
    pub to_remove: BTreeSet<Statement>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// `to_add = desired - current`, `to_remove = current - desired`.
pub fn diff(current: &BTreeSet<Statement>, desired: &BTreeSet<Statement>) -> Diff {
    Diff {
        to_add: desired.difference(current).cloned().collect(),
        to_remove: current.difference(desired).cloned().collect(),
    }
}
