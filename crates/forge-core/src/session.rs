//! The build session: single owner of tree, steps, and edit set
//!
//! All core operations go through an explicit session value; there is no
//! process-wide state. The caller serializes batches: apply one, persist
//! it, then apply the next against the same session.

use forge_types::{FileNode, FileTree, Generation, MountTree, Step};

use crate::artifact::parse_artifact;
use crate::edits::EditTracker;
use crate::error::{ForgeError, Result};
use crate::tree::{apply_steps, ApplyReport};
use crate::{mount, telemetry};

/// In-memory state of one generation session.
#[derive(Debug, Clone, Default)]
pub struct BuildSession {
    steps: Vec<Step>,
    tree: FileTree,
    edits: EditTracker,
}

impl BuildSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from its persisted envelope. Steps, tree, and
    /// edited paths are restored together so overwrite protection survives
    /// a reload.
    pub fn from_generation(generation: &Generation) -> Self {
        Self {
            steps: generation.steps.clone(),
            tree: generation.tree.clone(),
            edits: EditTracker::restore(generation.edited_paths.iter().cloned()),
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn edits(&self) -> &EditTracker {
        &self.edits
    }

    /// Parse one round of model output and append its steps to the
    /// history. Returns how many steps were added. Later rounds append;
    /// ids restart per batch, mirroring the per-response parse.
    pub fn ingest(&mut self, raw: &str) -> usize {
        let parsed = parse_artifact(raw);
        let count = parsed.len();
        self.steps.extend(parsed);
        count
    }

    /// Apply all pending steps to the tree, then instrument entry files
    /// when anything changed.
    pub fn synthesize(&mut self) -> ApplyReport {
        let (next, report) = apply_steps(&self.tree, &mut self.steps, &self.edits);
        self.tree = if report.changed {
            telemetry::inject(next)
        } else {
            next
        };
        report
    }

    /// Editor round-trip: replace one file's content and latch the path as
    /// user-edited.
    pub fn edit_file(&mut self, path: &str, content: &str) -> Result<()> {
        match self.tree.find_mut(path) {
            Some(FileNode::File {
                content: existing, ..
            }) => {
                *existing = content.to_string();
                self.edits.mark(path);
                Ok(())
            }
            Some(_) => Err(ForgeError::NotAFile(path.to_string())),
            None => Err(ForgeError::FileNotFound(path.to_string())),
        }
    }

    pub fn find_file(&self, path: &str) -> Option<&FileNode> {
        self.tree.find(path)
    }

    /// Project the current tree for the sandbox. Never cached.
    pub fn mount(&self) -> MountTree {
        mount::project(&self.tree)
    }

    /// Write the session state back into its persistence envelope.
    pub fn write_into(&self, generation: &mut Generation) {
        generation.steps = self.steps.clone();
        generation.tree = self.tree.clone();
        generation.edited_paths = self.edits.serialize();
        generation.touch();
    }
}
