//! Paddock - TrueSkill rating engine for multi-runner races
//!
//! This crate fits per-runner skill beliefs from finish orders with a
//! TrueSkill-style update, and turns those beliefs into win probabilities
//! by Monte Carlo simulation or numerical integration.

pub mod error;
pub mod fit;
pub mod model;
pub mod prob;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{ModelError, Result};
pub use types::*;

// Re-export key components
pub use fit::{BatchFitter, FitObserver, FitStats, NoopFitObserver, RaceUpdate, TracingFitObserver};
pub use model::{HorseModel, ModelSnapshot, RatingSnapshot};
pub use prob::{MonteCarloEstimator, TrapezoidEstimator, WinEstimator};
pub use rating::{RatingStore, RunnerRecord, TrueSkillParams, TrueSkillRater};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
