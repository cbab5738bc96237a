//! Shared types for the intent watcher.
//!
//! Everything that crosses a crate boundary lives here: the intent model
//! and its definition format, the observed [`Event`], the notifications the
//! engine publishes while it runs, and the schema helpers implementations
//! use to validate their TOML configuration.

pub mod engine;
pub mod event;
pub mod intent;
pub mod validation;

pub use engine::*;
pub use event::*;
pub use intent::*;
pub use validation::*;
