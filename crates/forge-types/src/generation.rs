//! Persisted generation envelope

use crate::{FileTree, Step};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Starter template families a fresh session can begin from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    React,
    Node,
}

impl TemplateKind {
    /// Interpret the classifier model's one-word answer. Anything that is
    /// not recognizably "react" falls back to the plain Node starter.
    pub fn detect(answer: &str) -> Self {
        if answer.to_lowercase().contains("react") {
            TemplateKind::React
        } else {
            TemplateKind::Node
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::React => "react",
            TemplateKind::Node => "node",
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One build session as persisted by a generation store.
///
/// The tree and the edited-path set always travel together in this record:
/// restoring one without the other would drop the overwrite protection for
/// hand-edited files on reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub id: String,
    pub prompt: String,
    pub model_name: String,
    /// Raw model output the steps were parsed from.
    pub output: String,
    pub steps: Vec<Step>,
    pub tree: FileTree,
    pub edited_paths: Vec<String>,
    /// Path of the file open in the editor, restored on reload.
    pub selected_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Generation {
    pub fn new(
        id: impl Into<String>,
        prompt: impl Into<String>,
        model_name: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            prompt: prompt.into(),
            model_name: model_name.into(),
            output: output.into(),
            steps: Vec::new(),
            tree: FileTree::new(),
            edited_paths: Vec::new(),
            selected_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
