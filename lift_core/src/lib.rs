#![forbid(unsafe_code)]

//! Core domain model and business logic for the Lift Coach system.
//!
//! This crate provides:
//! - Domain types (exercises, workout templates, completed sessions)
//! - Next-session target suggestion engine
//! - Session walker state machine with undo
//! - File-backed persistence (JSONL store)
//! - History queries and CSV export
//! - Preset workout catalog

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod history;
pub mod presets;
pub mod suggestion;
pub mod session;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, ProgressionConfig, SessionConfig};
pub use store::{JsonStore, WorkoutStore};
pub use history::{exercise_history, exercise_history_since};
pub use presets::{preset_catalog, seed_presets};
pub use suggestion::{suggest_next, Suggestion};
pub use session::{Effect, Phase, RestTimer, Session, SetInput, Step};
pub use export::export_completed;
