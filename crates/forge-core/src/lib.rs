//! Forge - Core Library
//!
//! The build-plan compiler: parsing model artifacts into typed steps,
//! folding steps into the session file tree without clobbering hand
//! edits, and projecting the tree for the preview sandbox.

// Re-export pure types from forge-types
pub use forge_types::*;

pub mod artifact;
pub mod edits;
pub mod error;
pub mod export;
pub mod mount;
pub mod ports;
pub mod session;
pub mod telemetry;
pub mod template;
pub mod tree;

pub use artifact::{decode_entities, encode_entities, parse_artifact};
pub use edits::EditTracker;
pub use error::{ForgeError, NodeKind, Result, SynthesisError, TreeCorruption};
pub use ports::{CompletionClient, GenerationStore};
pub use session::BuildSession;
pub use tree::{apply_steps, ApplyReport, StepFailure};
