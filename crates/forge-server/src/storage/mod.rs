//! Storage layer
//!
//! Two `GenerationStore` implementations: a DashMap-backed in-memory store
//! and a JSON-files-on-disk store used by the running server.

pub mod disk;
pub mod memory;

pub use disk::FileStore;
pub use memory::MemoryStore;
