//! Rating system integration using the TrueSkill algorithm
//!
//! This module provides the rank-group rating update, the runner record
//! store, and integration with the skillratings crate.

pub mod store;
pub mod trueskill;

// Re-export commonly used types
pub use store::{RatingStore, RunnerRecord};
pub use trueskill::{TrueSkillParams, TrueSkillRater};
