//! Persistent key-value storage.
//!
//! The quiz configuration lives in a small string-keyed store, the way a
//! browser keeps per-origin local storage: synchronous reads and writes,
//! last write wins.

mod kv;
mod quiz_config;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use quiz_config::ConfigurationStore;
