//! Rating store for runner skill records
//!
//! This module holds the per-runner state: current belief plus race and win
//! counters, created lazily with the configured prior on first reference.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Belief, RunnerId};

/// Store entry for a runner: current belief plus career counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerRecord {
    pub runner: RunnerId,
    pub belief: Belief,
    pub races_run: u32,
    pub races_won: u32,
}

impl RunnerRecord {
    /// Create a fresh record seeded with the prior belief
    pub fn new(runner: RunnerId, prior: Belief) -> Self {
        Self {
            runner,
            belief: prior,
            races_run: 0,
            races_won: 0,
        }
    }

    /// Replace the belief and bump the career counters
    pub fn apply_update(&mut self, new_belief: Belief, won: bool) {
        self.belief = new_belief;
        self.races_run += 1;
        if won {
            self.races_won += 1;
        }
    }
}

/// In-memory map from runner to record
///
/// Records are created lazily and never deleted. The store has a single
/// logical writer (the fitter); exclusive `&mut` access enforces that at
/// compile time, so there is no interior locking.
#[derive(Debug, Clone)]
pub struct RatingStore {
    prior: Belief,
    records: HashMap<RunnerId, RunnerRecord>,
}

impl RatingStore {
    /// Create an empty store seeding new records with `prior`
    pub fn new(prior: Belief) -> Self {
        Self {
            prior,
            records: HashMap::new(),
        }
    }

    /// Prior belief assigned to unseen runners
    pub fn prior(&self) -> Belief {
        self.prior
    }

    /// Record for a runner, if one exists
    pub fn get(&self, runner: &str) -> Option<&RunnerRecord> {
        self.records.get(runner)
    }

    /// Record for a runner, inserting a prior-seeded one on first reference
    pub fn get_or_create(&mut self, runner: &str) -> &RunnerRecord {
        let prior = self.prior;
        self.records
            .entry(runner.to_string())
            .or_insert_with_key(|key| RunnerRecord::new(key.clone(), prior))
    }

    /// Current beliefs in input order
    ///
    /// Unseen runners are seeded with the prior; race counters are never
    /// touched by a read.
    pub fn ratings_for(&mut self, runners: &[RunnerId]) -> Vec<Belief> {
        runners.iter().map(|r| self.get_or_create(r).belief).collect()
    }

    /// Replace a runner's belief and bump its counters
    ///
    /// Called exactly once per participant per race; `won` marks whether the
    /// runner is in the race's winner set.
    pub fn apply_update(&mut self, runner: &str, new_belief: Belief, won: bool) -> &RunnerRecord {
        let prior = self.prior;
        let record = self
            .records
            .entry(runner.to_string())
            .or_insert_with_key(|key| RunnerRecord::new(key.clone(), prior));
        record.apply_update(new_belief, won);
        record
    }

    /// Insert a fully-formed record, replacing any existing one
    pub fn insert(&mut self, record: RunnerRecord) {
        self.records.insert(record.runner.clone(), record);
    }

    /// Number of runners ever referenced
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in arbitrary map order
    pub fn records(&self) -> impl Iterator<Item = &RunnerRecord> {
        self.records.values()
    }
}
