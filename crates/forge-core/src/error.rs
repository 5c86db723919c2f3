//! Error types for Forge

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForgeError>;

/// Crate-level error type.
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("File not found in tree: {0}")]
    FileNotFound(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Invalid export path: {0}")]
    InvalidExportPath(String),

    #[error("Generation not found: {0}")]
    GenerationNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ForgeError {
    fn from(e: serde_json::Error) -> Self {
        ForgeError::Serialization(e.to_string())
    }
}

/// Per-step failure conditions raised while folding steps into the tree.
///
/// These never abort a batch; they are reported alongside the steps that
/// did apply.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SynthesisError {
    /// A file step arrived without a usable path.
    #[error("step {step_id} has no usable file path")]
    InvalidStepPath { step_id: u32 },

    /// A step implies a folder where a file already exists, or the other
    /// way round. The existing node is never overwritten.
    #[error("path type conflict at {path}: a {existing} already exists there")]
    PathTypeConflict { path: String, existing: NodeKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::Folder => write!(f, "folder"),
        }
    }
}

/// Violations of the structural tree invariants. These indicate a bug in
/// whatever produced the tree, not a recoverable input condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeCorruption {
    #[error("duplicate path in tree: {0}")]
    DuplicatePath(String),

    #[error("node path {path} does not match its position {expected}")]
    PathMismatch { path: String, expected: String },
}
