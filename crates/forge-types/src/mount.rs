//! Mount descriptor handed to the sandbox runtime

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A directory level of the mount descriptor, keyed by entry name.
/// Insertion order is preserved so remounts see a stable layout.
pub type MountTree = IndexMap<String, MountEntry>;

/// One entry of the mount descriptor.
///
/// Serializes to the shape the sandbox expects:
/// `{"directory": {...}}` or `{"file": {"contents": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountEntry {
    Directory(MountTree),
    File(MountFile),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountFile {
    pub contents: String,
}
