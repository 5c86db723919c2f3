//! Ports to external collaborators
//!
//! The core hands plain in-memory values across these seams; transport and
//! persistence live behind them.

use async_trait::async_trait;
use forge_types::{ChatMessage, Generation};

use crate::error::Result;

/// Chat transport to the generative model.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the conversation and return the model's raw text reply.
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String>;
}

/// Persistence for generation envelopes.
///
/// Stores only ever see whole records: the tree and the edited-path set
/// travel together, otherwise overwrite protection breaks on reload.
#[async_trait]
pub trait GenerationStore: Send + Sync {
    async fn create(&self, generation: &Generation) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Generation>>;
    async fn update(&self, generation: &Generation) -> Result<()>;
    /// All generations, newest first.
    async fn list(&self) -> Result<Vec<Generation>>;
}
