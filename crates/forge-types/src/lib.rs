//! Forge Types - Pure type definitions
//!
//! This crate contains only pure data types with no async runtime
//! dependencies: build steps, the session file tree, the sandbox mount
//! descriptor, chat messages, and the persisted generation envelope.

pub mod chat;
pub mod generation;
pub mod mount;
pub mod step;
pub mod tree;

pub use chat::*;
pub use generation::*;
pub use mount::*;
pub use step::*;
pub use tree::*;
