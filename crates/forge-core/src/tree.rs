//! Tree synthesis: folding pending steps into the session file tree
//!
//! The merge works over an arena of nodes addressed by stable index, with
//! explicit child-index lists per folder. The input tree is never mutated;
//! a fresh tree value comes back out together with a report of what
//! happened to each step.

use std::collections::{HashMap, HashSet};

use forge_types::{FileNode, FileTree, Step, StepAction};
use serde::Serialize;
use tracing::debug;

use crate::edits::EditTracker;
use crate::error::{NodeKind, SynthesisError, TreeCorruption};

/// Outcome of applying one batch of steps.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    /// True when any node was created or any file content was written;
    /// the caller uses this to decide whether to persist.
    pub changed: bool,
    /// Ids of steps that were processed without error.
    pub applied: Vec<u32>,
    /// Steps that could not be applied, with the reason.
    pub failures: Vec<StepFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepFailure {
    pub step_id: u32,
    pub error: SynthesisError,
}

/// Apply every `pending` step in `steps` onto a working copy of `tree`.
///
/// File steps create missing intermediate folders, create missing files,
/// and overwrite existing file content unless the path is marked edited
/// (then the step is a silent no-op). Bootstrap folder steps and shell
/// steps never touch the tree. Every processed step, including failed
/// ones, moves to `completed`; steps already completed or in progress are
/// skipped untouched. A failing step leaves the tree exactly as the
/// previous step left it.
pub fn apply_steps(
    tree: &FileTree,
    steps: &mut [Step],
    edits: &EditTracker,
) -> (FileTree, ApplyReport) {
    debug_assert!(
        validate(tree).is_ok(),
        "tree invariants violated before apply"
    );

    let mut arena = Arena::from_tree(tree);
    let mut report = ApplyReport::default();

    for step in steps.iter_mut().filter(|s| s.is_pending()) {
        match &step.action {
            // Display-only steps: the bootstrap marker and shell commands
            // are recorded for the runtime, never applied to the tree.
            StepAction::CreateFolder | StepAction::RunScript { .. } => {}
            StepAction::CreateFile { path, code } => {
                match arena.upsert_file(step.id, path, code, edits) {
                    Ok(mutated) => report.changed |= mutated,
                    Err(error) => {
                        debug!(step_id = step.id, %error, "build step failed");
                        report.failures.push(StepFailure {
                            step_id: step.id,
                            error,
                        });
                        step.complete();
                        continue;
                    }
                }
            }
        }
        report.applied.push(step.id);
        step.complete();
    }

    let next = arena.into_tree();
    debug_assert!(
        validate(&next).is_ok(),
        "tree invariants violated after apply"
    );
    (next, report)
}

/// Check the structural invariants: every node's path is the `/`-join of
/// its ancestors' names, and no two nodes share a path.
pub fn validate(tree: &FileTree) -> Result<(), TreeCorruption> {
    fn walk(
        node: &FileNode,
        parent: &str,
        seen: &mut HashSet<String>,
    ) -> Result<(), TreeCorruption> {
        let expected = format!("{}/{}", parent, node.name());
        if node.path() != expected {
            return Err(TreeCorruption::PathMismatch {
                path: node.path().to_string(),
                expected,
            });
        }
        if !seen.insert(expected) {
            return Err(TreeCorruption::DuplicatePath(node.path().to_string()));
        }
        if let FileNode::Folder { children, .. } = node {
            for child in children {
                walk(child, node.path(), seen)?;
            }
        }
        Ok(())
    }

    let mut seen = HashSet::new();
    for root in &tree.roots {
        walk(root, "", &mut seen)?;
    }
    Ok(())
}

#[derive(Debug)]
enum Slot {
    File { content: String },
    Folder { children: Vec<usize> },
}

#[derive(Debug)]
struct Node {
    name: String,
    path: String,
    slot: Slot,
}

/// Index-addressed working copy of the tree.
#[derive(Debug, Default)]
struct Arena {
    nodes: Vec<Node>,
    roots: Vec<usize>,
    by_path: HashMap<String, usize>,
}

impl Arena {
    fn from_tree(tree: &FileTree) -> Self {
        fn add(arena: &mut Arena, node: &FileNode, parent: Option<usize>) {
            let idx = match node {
                FileNode::File { name, path, content } => arena.insert(
                    parent,
                    name,
                    path,
                    Slot::File {
                        content: content.clone(),
                    },
                ),
                FileNode::Folder { name, path, .. } => arena.insert(
                    parent,
                    name,
                    path,
                    Slot::Folder {
                        children: Vec::new(),
                    },
                ),
            };
            if let FileNode::Folder { children, .. } = node {
                for child in children {
                    add(arena, child, Some(idx));
                }
            }
        }

        let mut arena = Arena::default();
        for root in &tree.roots {
            add(&mut arena, root, None);
        }
        arena
    }

    fn insert(&mut self, parent: Option<usize>, name: &str, path: &str, slot: Slot) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            name: name.to_string(),
            path: path.to_string(),
            slot,
        });
        self.by_path.insert(path.to_string(), idx);
        match parent {
            Some(p) => {
                if let Slot::Folder { children } = &mut self.nodes[p].slot {
                    children.push(idx);
                }
            }
            None => self.roots.push(idx),
        }
        idx
    }

    /// Create or overwrite the file at `path`, creating missing folders
    /// along the way. Returns whether anything was written.
    fn upsert_file(
        &mut self,
        step_id: u32,
        path: &str,
        code: &str,
        edits: &EditTracker,
    ) -> Result<bool, SynthesisError> {
        let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
        if components.is_empty() {
            return Err(SynthesisError::InvalidStepPath { step_id });
        }

        // Validate the whole chain first so a conflicting step leaves the
        // tree untouched rather than half-created.
        let mut prefix = String::new();
        for (depth, component) in components.iter().enumerate() {
            prefix.push('/');
            prefix.push_str(component);
            let last = depth + 1 == components.len();
            if let Some(&idx) = self.by_path.get(&prefix) {
                match (&self.nodes[idx].slot, last) {
                    (Slot::Folder { .. }, false) | (Slot::File { .. }, true) => {}
                    (Slot::Folder { .. }, true) => {
                        return Err(SynthesisError::PathTypeConflict {
                            path: prefix,
                            existing: NodeKind::Folder,
                        });
                    }
                    (Slot::File { .. }, false) => {
                        return Err(SynthesisError::PathTypeConflict {
                            path: prefix,
                            existing: NodeKind::File,
                        });
                    }
                }
            }
        }

        let mut mutated = false;
        let mut prefix = String::new();
        let mut parent: Option<usize> = None;
        for (depth, component) in components.iter().enumerate() {
            prefix.push('/');
            prefix.push_str(component);
            let last = depth + 1 == components.len();
            match self.by_path.get(&prefix).copied() {
                Some(idx) => {
                    if last {
                        // Hand edits win over regenerated content.
                        if !edits.is_edited(&prefix) {
                            if let Slot::File { content } = &mut self.nodes[idx].slot {
                                *content = code.to_string();
                                mutated = true;
                            }
                        }
                    } else {
                        parent = Some(idx);
                    }
                }
                None => {
                    let slot = if last {
                        Slot::File {
                            content: code.to_string(),
                        }
                    } else {
                        Slot::Folder {
                            children: Vec::new(),
                        }
                    };
                    let idx = self.insert(parent, component, &prefix, slot);
                    mutated = true;
                    if !last {
                        parent = Some(idx);
                    }
                }
            }
        }
        Ok(mutated)
    }

    fn into_tree(self) -> FileTree {
        fn build(arena: &Arena, idx: usize) -> FileNode {
            let node = &arena.nodes[idx];
            match &node.slot {
                Slot::File { content } => {
                    FileNode::file(&node.name, &node.path, content.clone())
                }
                Slot::Folder { children } => FileNode::folder(
                    &node.name,
                    &node.path,
                    children.iter().map(|&child| build(arena, child)).collect(),
                ),
            }
        }

        FileTree {
            roots: self.roots.iter().map(|&root| build(&self, root)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_types::StepStatus;

    fn file_step(id: u32, path: &str, code: &str) -> Step {
        Step::create_file(id, path, code)
    }

    #[test]
    fn fresh_file_creates_nested_folders() {
        let mut steps = vec![file_step(1, "src/App.tsx", "hello")];
        let (tree, report) = apply_steps(&FileTree::new(), &mut steps, &EditTracker::new());

        assert!(report.changed);
        assert!(report.failures.is_empty());
        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.roots[0].path(), "/src");
        let file = tree.find("/src/App.tsx").unwrap();
        assert_eq!(
            file,
            &FileNode::file("App.tsx", "/src/App.tsx", "hello")
        );
        assert_eq!(steps[0].status, StepStatus::Completed);
    }

    #[test]
    fn shared_prefixes_create_intermediate_folders_once() {
        let mut steps = vec![
            file_step(1, "src/components/Button.tsx", "b"),
            file_step(2, "src/components/Input.tsx", "i"),
            file_step(3, "src/main.tsx", "m"),
        ];
        let (tree, report) = apply_steps(&FileTree::new(), &mut steps, &EditTracker::new());

        assert!(report.changed);
        assert_eq!(tree.roots.len(), 1);
        let FileNode::Folder { children, .. } = &tree.roots[0] else {
            panic!("expected /src to be a folder");
        };
        // One components folder, then main.tsx, in insertion order.
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].path(), "/src/components");
        assert_eq!(children[1].path(), "/src/main.tsx");
        let FileNode::Folder { children, .. } = &children[0] else {
            panic!("expected /src/components to be a folder");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name(), "Button.tsx");
        assert_eq!(children[1].name(), "Input.tsx");
        assert!(validate(&tree).is_ok());
    }

    #[test]
    fn edited_paths_are_never_overwritten() {
        let start = FileTree {
            roots: vec![FileNode::folder(
                "a",
                "/a",
                vec![FileNode::file("b.txt", "/a/b.txt", "mine")],
            )],
        };
        let mut edits = EditTracker::new();
        edits.mark("/a/b.txt");

        let mut steps = vec![file_step(1, "a/b.txt", "ai-version")];
        let (tree, report) = apply_steps(&start, &mut steps, &edits);

        let FileNode::File { content, .. } = tree.find("/a/b.txt").unwrap() else {
            panic!("expected a file");
        };
        assert_eq!(content, "mine");
        assert_eq!(steps[0].status, StepStatus::Completed);
        assert!(report.failures.is_empty());
        // The skip is silent: nothing else changed either.
        assert!(!report.changed);
    }

    #[test]
    fn unedited_files_are_overwritten() {
        let start = FileTree {
            roots: vec![FileNode::folder(
                "a",
                "/a",
                vec![FileNode::file("b.txt", "/a/b.txt", "old")],
            )],
        };
        let mut steps = vec![file_step(1, "a/b.txt", "new")];
        let (tree, report) = apply_steps(&start, &mut steps, &EditTracker::new());

        let FileNode::File { content, .. } = tree.find("/a/b.txt").unwrap() else {
            panic!("expected a file");
        };
        assert_eq!(content, "new");
        assert!(report.changed);
    }

    #[test]
    fn shell_steps_complete_without_touching_the_tree() {
        let mut steps = vec![Step::run_script(1, "npm install")];
        let (tree, report) = apply_steps(&FileTree::new(), &mut steps, &EditTracker::new());

        assert!(tree.is_empty());
        assert!(!report.changed);
        assert_eq!(report.applied, vec![1]);
        assert_eq!(steps[0].status, StepStatus::Completed);
    }

    #[test]
    fn empty_path_fails_without_aborting_the_batch() {
        let mut steps = vec![
            file_step(1, "", "lost"),
            file_step(2, "kept.txt", "kept"),
        ];
        let (tree, report) = apply_steps(&FileTree::new(), &mut steps, &EditTracker::new());

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].step_id, 1);
        assert_eq!(
            report.failures[0].error,
            SynthesisError::InvalidStepPath { step_id: 1 }
        );
        assert!(tree.find("/kept.txt").is_some());
        assert_eq!(report.applied, vec![2]);
        // Failed steps are completed too; the report is the failure channel.
        assert_eq!(steps[0].status, StepStatus::Completed);
    }

    #[test]
    fn file_where_folder_expected_is_a_type_conflict() {
        let start = FileTree {
            roots: vec![FileNode::file("a", "/a", "i am a file")],
        };
        let mut steps = vec![file_step(1, "a/b.txt", "nested")];
        let (tree, report) = apply_steps(&start, &mut steps, &EditTracker::new());

        assert_eq!(
            report.failures[0].error,
            SynthesisError::PathTypeConflict {
                path: "/a".to_string(),
                existing: NodeKind::File,
            }
        );
        // The conflicting node kept its type and content.
        assert_eq!(tree, start);
        assert!(!report.changed);
    }

    #[test]
    fn folder_where_file_expected_is_a_type_conflict() {
        let start = FileTree {
            roots: vec![FileNode::folder("src", "/src", Vec::new())],
        };
        let mut steps = vec![file_step(1, "src", "overwrite a folder?")];
        let (_, report) = apply_steps(&start, &mut steps, &EditTracker::new());

        assert_eq!(
            report.failures[0].error,
            SynthesisError::PathTypeConflict {
                path: "/src".to_string(),
                existing: NodeKind::Folder,
            }
        );
    }

    #[test]
    fn conflicting_step_creates_no_partial_folders() {
        let start = FileTree {
            roots: vec![FileNode::folder(
                "src",
                "/src",
                vec![FileNode::file("lib", "/src/lib", "file, not folder")],
            )],
        };
        let mut steps = vec![file_step(1, "src/lib/deep/mod.rs", "nested")];
        let (tree, report) = apply_steps(&start, &mut steps, &EditTracker::new());

        assert_eq!(report.failures.len(), 1);
        assert_eq!(tree, start);
    }

    #[test]
    fn completed_steps_are_skipped() {
        let mut steps = vec![file_step(1, "a.txt", "first")];
        let (tree, _) = apply_steps(&FileTree::new(), &mut steps, &EditTracker::new());

        // Re-applying the same, now completed, batch changes nothing even
        // though the file content on disk has since diverged.
        let mut tree = tree;
        if let Some(FileNode::File { content, .. }) = tree.find_mut("/a.txt") {
            *content = "diverged".to_string();
        }
        let (tree, report) = apply_steps(&tree, &mut steps, &EditTracker::new());
        let FileNode::File { content, .. } = tree.find("/a.txt").unwrap() else {
            panic!("expected a file");
        };
        assert_eq!(content, "diverged");
        assert!(!report.changed);
        assert!(report.applied.is_empty());
    }

    #[test]
    fn apply_preserves_path_invariants() {
        let mut steps = vec![
            file_step(1, "src/a/b/c.txt", "1"),
            file_step(2, "src/a/d.txt", "2"),
            file_step(3, "top.txt", "3"),
        ];
        let (tree, _) = apply_steps(&FileTree::new(), &mut steps, &EditTracker::new());
        assert!(validate(&tree).is_ok());
    }

    #[test]
    fn validate_rejects_corrupt_trees() {
        let duplicate = FileTree {
            roots: vec![
                FileNode::file("a.txt", "/a.txt", "1"),
                FileNode::file("a.txt", "/a.txt", "2"),
            ],
        };
        assert_eq!(
            validate(&duplicate),
            Err(TreeCorruption::DuplicatePath("/a.txt".to_string()))
        );

        let mismatched = FileTree {
            roots: vec![FileNode::folder(
                "src",
                "/src",
                vec![FileNode::file("x.txt", "/elsewhere/x.txt", "")],
            )],
        };
        assert!(matches!(
            validate(&mismatched),
            Err(TreeCorruption::PathMismatch { .. })
        ));
    }
}
