//! External collaborators wired up for the running server

pub mod completion;

pub use completion::GeminiClient;
