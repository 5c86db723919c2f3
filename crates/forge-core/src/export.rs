//! Exporting the session tree to a real directory

use std::fs;
use std::path::Path;

use forge_types::{FileNode, FileTree};
use tracing::debug;

use crate::error::{ForgeError, Result};

/// Materialize the tree under `dest`, creating `dest` if needed.
/// Returns the number of files written. Node names that would escape the
/// destination directory abort the export.
pub fn write_tree(tree: &FileTree, dest: &Path) -> Result<usize> {
    fs::create_dir_all(dest)?;
    let mut written = 0;
    for root in &tree.roots {
        write_node(root, dest, &mut written)?;
    }
    debug!(files = written, dest = %dest.display(), "exported tree");
    Ok(written)
}

fn write_node(node: &FileNode, dir: &Path, written: &mut usize) -> Result<()> {
    let name = node.name();
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(ForgeError::InvalidExportPath(node.path().to_string()));
    }
    let target = dir.join(name);
    match node {
        FileNode::File { content, .. } => {
            fs::write(&target, content)?;
            *written += 1;
        }
        FileNode::Folder { children, .. } => {
            fs::create_dir_all(&target)?;
            for child in children {
                write_node(child, &target, written)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "forge_export_{}_{}",
            label,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn writes_folders_and_files() {
        let tree = FileTree {
            roots: vec![
                FileNode::folder(
                    "src",
                    "/src",
                    vec![FileNode::file("main.rs", "/src/main.rs", "fn main() {}")],
                ),
                FileNode::file("README.md", "/README.md", "# hi"),
            ],
        };
        let dest = temp_dir("ok");

        let written = write_tree(&tree, &dest).unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            fs::read_to_string(dest.join("src/main.rs")).unwrap(),
            "fn main() {}"
        );
        assert_eq!(fs::read_to_string(dest.join("README.md")).unwrap(), "# hi");

        let _ = fs::remove_dir_all(&dest);
    }

    #[test]
    fn rejects_escaping_names() {
        let tree = FileTree {
            roots: vec![FileNode::file("..", "/..", "nope")],
        };
        let dest = temp_dir("escape");

        assert!(matches!(
            write_tree(&tree, &dest),
            Err(ForgeError::InvalidExportPath(_))
        ));

        let _ = fs::remove_dir_all(&dest);
    }
}
