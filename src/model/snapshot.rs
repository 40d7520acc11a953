//! Persisted model state
//!
//! A snapshot carries the hyperparameters and one entry per runner. The
//! field set is the model's wire contract: `ts` holds the TrueSkill
//! parameters and `ratings` the per-runner beliefs and counters. Loading
//! validates the stored state and fails fast instead of defaulting
//! anything silently.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::rating::{RunnerRecord, TrueSkillParams};
use crate::types::{Belief, RunnerId};

/// One persisted runner entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    pub runner: RunnerId,
    pub mu: f64,
    pub sigma: f64,
    pub n_races: u32,
    pub n_wins: u32,
}

impl From<&RunnerRecord> for RatingSnapshot {
    fn from(record: &RunnerRecord) -> Self {
        Self {
            runner: record.runner.clone(),
            mu: record.belief.mu,
            sigma: record.belief.sigma,
            n_races: record.races_run,
            n_wins: record.races_won,
        }
    }
}

impl From<RatingSnapshot> for RunnerRecord {
    fn from(snapshot: RatingSnapshot) -> Self {
        Self {
            runner: snapshot.runner,
            belief: Belief::new(snapshot.mu, snapshot.sigma),
            races_run: snapshot.n_races,
            races_won: snapshot.n_wins,
        }
    }
}

/// Complete persisted model state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub ts: TrueSkillParams,
    pub ratings: Vec<RatingSnapshot>,
}

impl ModelSnapshot {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a stored snapshot
    pub fn from_json(raw: &str) -> Result<Self> {
        let snapshot: ModelSnapshot =
            serde_json::from_str(raw).map_err(|e| ModelError::InconsistentSnapshot {
                reason: e.to_string(),
            })?;
        snapshot.validate()?;

        Ok(snapshot)
    }

    /// Check the stored state for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.ts
            .validate()
            .map_err(|e| ModelError::InconsistentSnapshot {
                reason: format!("hyperparameters: {}", e),
            })?;

        let mut seen: HashSet<&str> = HashSet::new();
        for entry in &self.ratings {
            if !seen.insert(entry.runner.as_str()) {
                return Err(ModelError::InconsistentSnapshot {
                    reason: format!("duplicate runner '{}'", entry.runner),
                }
                .into());
            }

            if !entry.mu.is_finite() || !entry.sigma.is_finite() || entry.sigma <= 0.0 {
                return Err(ModelError::InconsistentSnapshot {
                    reason: format!(
                        "runner '{}' has invalid belief (mu {}, sigma {})",
                        entry.runner, entry.mu, entry.sigma
                    ),
                }
                .into());
            }

            if entry.n_wins > entry.n_races {
                return Err(ModelError::InconsistentSnapshot {
                    reason: format!(
                        "runner '{}' has {} wins over {} races",
                        entry.runner, entry.n_wins, entry.n_races
                    ),
                }
                .into());
            }
        }

        Ok(())
    }
}
