//! Fit progress and audit observation
//!
//! The fitter reports per-race updates and periodic progress through an
//! injected observer rather than an ambient logging singleton. The default
//! observer logs through `tracing`; the no-op observer keeps the core fully
//! functional with no sink at all.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::rating::RunnerRecord;
use crate::types::{Race, RunnerId};

/// Post-update records for one fitted race, keyed by runner
pub type RaceUpdate = HashMap<RunnerId, RunnerRecord>;

/// Observer for batch-fit side channels
pub trait FitObserver: Send + Sync {
    /// Called once per processed race with the post-update records
    fn race_fitted(&self, race: &Race, update: &RaceUpdate);

    /// Called at every progress interval with the processed-race count
    fn progress(&self, races_processed: usize);
}

/// Observer that drops every observation
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFitObserver;

impl FitObserver for NoopFitObserver {
    fn race_fitted(&self, _race: &Race, _update: &RaceUpdate) {}

    fn progress(&self, _races_processed: usize) {}
}

/// Observer that logs through the tracing macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFitObserver;

impl FitObserver for TracingFitObserver {
    fn race_fitted(&self, race: &Race, update: &RaceUpdate) {
        debug!(
            "Fitted race - runners: {}, rank groups: {}, records updated: {}",
            race.selection.len(),
            race.ranking.len(),
            update.len()
        );
    }

    fn progress(&self, races_processed: usize) {
        info!("Batch fit progress - races processed: {}", races_processed);
    }
}
