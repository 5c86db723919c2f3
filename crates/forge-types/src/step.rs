//! Build steps parsed from a model artifact

use serde::{Deserialize, Serialize};

/// Lifecycle of a step.
///
/// Status only ever moves forward: `pending` -> `completed`, with
/// `in-progress` reserved for the runtime that executes shell steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Pending => write!(f, "pending"),
            StepStatus::InProgress => write!(f, "in-progress"),
            StepStatus::Completed => write!(f, "completed"),
        }
    }
}

/// What a step does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepAction {
    /// Bootstrap marker derived from the artifact title; never touches the tree.
    CreateFolder,
    /// Write `code` to `path`. An empty path is tolerated at parse time and
    /// rejected during synthesis.
    CreateFile { path: String, code: String },
    /// A shell command for the sandbox runtime; recorded, never applied.
    RunScript { code: String },
}

/// One parsed instruction from a build artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: u32,
    pub title: String,
    pub status: StepStatus,
    #[serde(flatten)]
    pub action: StepAction,
}

impl Step {
    /// Bootstrap folder step carrying the artifact title.
    pub fn create_folder(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            status: StepStatus::Pending,
            action: StepAction::CreateFolder,
        }
    }

    pub fn create_file(id: u32, path: impl Into<String>, code: impl Into<String>) -> Self {
        let path = path.into();
        let title = if path.is_empty() {
            "Create file".to_string()
        } else {
            format!("Create {}", path)
        };
        Self {
            id,
            title,
            status: StepStatus::Pending,
            action: StepAction::CreateFile {
                path,
                code: code.into(),
            },
        }
    }

    pub fn run_script(id: u32, code: impl Into<String>) -> Self {
        Self {
            id,
            title: "Run command".to_string(),
            status: StepStatus::Pending,
            action: StepAction::RunScript { code: code.into() },
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == StepStatus::Pending
    }

    /// Advance the step to `completed`. Statuses never revert, so this is
    /// the only transition exposed on the type itself.
    pub fn complete(&mut self) {
        self.status = StepStatus::Completed;
    }
}
