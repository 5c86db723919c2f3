//! Projection of the session tree into the sandbox mount descriptor

use forge_types::{FileNode, FileTree, MountEntry, MountFile, MountTree};

/// Convert the tree into the nested descriptor the sandbox mounts.
///
/// Pure and uncached: the sandbox may remount at any time and must always
/// see the latest tree. Child order carries through unchanged.
pub fn project(tree: &FileTree) -> MountTree {
    tree.roots
        .iter()
        .map(|node| (node.name().to_string(), entry(node)))
        .collect()
}

fn entry(node: &FileNode) -> MountEntry {
    match node {
        FileNode::File { content, .. } => MountEntry::File(MountFile {
            contents: content.clone(),
        }),
        FileNode::Folder { children, .. } => MountEntry::Directory(
            children
                .iter()
                .map(|child| (child.name().to_string(), entry(child)))
                .collect(),
        ),
    }
}
