//! # Giftbox Common
//!
//! Shared types, errors, and constants used across Giftbox components.
//!
//! ## Modules
//! - `types` - Core data structures (Question, QuizConfiguration, FlowState, etc.)
//! - `error` - The error taxonomy surfaced by the flow
//! - `constants` - Storage keys and built-in defaults

pub mod constants;
pub mod error;
pub mod types;

pub use error::GiftboxError;
pub use types::*;
