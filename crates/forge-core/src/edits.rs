//! Tracking of user-edited paths

use std::collections::BTreeSet;

/// The set of file paths a user has modified by hand in the editor.
///
/// Marking is a one-way latch: once a path is marked it stays protected
/// from generated overwrites for the lifetime of the session. Re-deriving
/// a file from the plan after a manual edit requires discarding the whole
/// session state, not toggling a single path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTracker {
    paths: BTreeSet<String>,
}

impl EditTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the tracker from a previously serialized path list.
    pub fn restore<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Mark a path as edited. Idempotent.
    pub fn mark(&mut self, path: impl Into<String>) {
        self.paths.insert(path.into());
    }

    pub fn is_edited(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Stable, ordered snapshot for the persistence envelope.
    pub fn serialize(&self) -> Vec<String> {
        self.paths.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
