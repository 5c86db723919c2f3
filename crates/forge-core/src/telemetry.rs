//! Runtime error telemetry for the preview sandbox
//!
//! The sandbox renders the generated app in an iframe; this pass rewrites
//! every HTML entry file so runtime errors and unhandled rejections are
//! posted back to the host page.

use forge_types::{FileNode, FileTree};

/// Entry files are recognized by suffix, wherever they sit in the tree.
pub const ENTRY_FILE_NAME: &str = "index.html";

/// Presence of this call marks a file as already instrumented.
const INJECTION_MARKER: &str = "window.parent.postMessage";

const CLOSING_BODY_TAG: &str = "</body>";

const ERROR_REPORTER_SNIPPET: &str = r#"
<script>
  window.addEventListener('error', function (e) {
    window.parent.postMessage(
      {
        type: 'runtime-error',
        message: e.message,
        filename: e.filename,
        lineno: e.lineno,
        colno: e.colno,
      },
      '*'
    );
  });

  window.addEventListener('unhandledrejection', function (e) {
    window.parent.postMessage(
      {
        type: 'unhandled-rejection',
        message: (e.reason && e.reason.toString) ? e.reason.toString() : 'Unhandled rejection',
      },
      '*'
    );
  });
</script>
"#;

/// Instrument every entry file in the tree. Idempotent: already-injected
/// content is recognized by the marker and left alone, so the pass runs
/// over the whole tree after each synthesis batch that changed anything.
pub fn inject(mut tree: FileTree) -> FileTree {
    for root in &mut tree.roots {
        visit(root);
    }
    tree
}

fn visit(node: &mut FileNode) {
    match node {
        FileNode::File { path, content, .. } => {
            if path.ends_with(ENTRY_FILE_NAME) && !content.contains(INJECTION_MARKER) {
                *content = match content.rfind(CLOSING_BODY_TAG) {
                    // Insert before the last closing body tag so the
                    // listeners register inside the document body.
                    Some(at) => format!(
                        "{}{}{}",
                        &content[..at],
                        ERROR_REPORTER_SNIPPET,
                        &content[at..]
                    ),
                    None => format!("{}{}", content, ERROR_REPORTER_SNIPPET),
                };
            }
        }
        FileNode::Folder { children, .. } => {
            for child in children {
                visit(child);
            }
        }
    }
}
