//! The session file tree

use serde::{Deserialize, Serialize};

/// One node of the session tree.
///
/// `path` is always the `/`-joined chain of ancestor names with a leading
/// separator, and is unique across the whole tree. A node's type never
/// changes once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileNode {
    File {
        name: String,
        path: String,
        content: String,
    },
    Folder {
        name: String,
        path: String,
        children: Vec<FileNode>,
    },
}

impl FileNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>, content: impl Into<String>) -> Self {
        FileNode::File {
            name: name.into(),
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn folder(name: impl Into<String>, path: impl Into<String>, children: Vec<FileNode>) -> Self {
        FileNode::Folder {
            name: name.into(),
            path: path.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileNode::File { name, .. } | FileNode::Folder { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FileNode::File { path, .. } | FileNode::Folder { path, .. } => path,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FileNode::File { .. })
    }

    /// Depth-first search by full path.
    pub fn find(&self, target: &str) -> Option<&FileNode> {
        if self.path() == target {
            return Some(self);
        }
        if let FileNode::Folder { children, .. } = self {
            for child in children {
                if let Some(found) = child.find(target) {
                    return Some(found);
                }
            }
        }
        None
    }

    pub fn find_mut(&mut self, target: &str) -> Option<&mut FileNode> {
        if self.path() == target {
            return Some(self);
        }
        if let FileNode::Folder { children, .. } = self {
            for child in children {
                if let Some(found) = child.find_mut(target) {
                    return Some(found);
                }
            }
        }
        None
    }
}

/// The whole session tree: an ordered forest of root nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTree {
    pub roots: Vec<FileNode>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn find(&self, path: &str) -> Option<&FileNode> {
        self.roots.iter().find_map(|root| root.find(path))
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut FileNode> {
        self.roots.iter_mut().find_map(|root| root.find_mut(path))
    }

    /// Number of file (leaf) nodes in the tree.
    pub fn file_count(&self) -> usize {
        fn count(node: &FileNode) -> usize {
            match node {
                FileNode::File { .. } => 1,
                FileNode::Folder { children, .. } => children.iter().map(count).sum(),
            }
        }
        self.roots.iter().map(count).sum()
    }
}
