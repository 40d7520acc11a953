//! Batch fitting of ordered race sequences
//!
//! Drives the rating update over races in strict chronological order,
//! accumulating summary statistics and reporting progress and per-race
//! audits through an injected observer.

pub mod observer;

// Re-export commonly used types
pub use observer::{FitObserver, NoopFitObserver, RaceUpdate, TracingFitObserver};

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{ModelError, Result};
use crate::model::HorseModel;
use crate::types::Race;

/// Summary statistics for one batch fit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FitStats {
    /// Races fitted into the model
    pub races_processed: usize,
    /// Races skipped for having fewer than two entries
    pub races_skipped: usize,
    /// Malformed races rejected by validation
    pub races_invalid: usize,
    /// Runners known to the store after the run
    pub distinct_runners: usize,
}

/// Sequential fitter for ordered race results
///
/// Races are consumed in input order: a later race must see the ratings
/// produced by every earlier one, so the fitter never reorders or
/// parallelizes a sequence. Malformed races are counted and skipped by
/// default; `strict(true)` propagates them instead. Updates are
/// all-or-nothing per race, so a rejected race leaves no partial state
/// behind.
pub struct BatchFitter {
    progress_every: usize,
    strict: bool,
    observer: Arc<dyn FitObserver>,
}

impl Default for BatchFitter {
    fn default() -> Self {
        Self {
            progress_every: 100,
            strict: false,
            observer: Arc::new(TracingFitObserver),
        }
    }
}

impl BatchFitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the progress/audit observer
    pub fn with_observer(mut self, observer: Arc<dyn FitObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Progress interval in processed races (minimum 1)
    pub fn with_progress_every(mut self, races: usize) -> Self {
        self.progress_every = races.max(1);
        self
    }

    /// Propagate malformed races instead of counting and skipping them
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Fit every race into the model, in input order
    pub fn fit<I>(&self, model: &mut HorseModel, races: I) -> Result<FitStats>
    where
        I: IntoIterator<Item = Race>,
    {
        let mut stats = FitStats::default();

        for race in races {
            if race.selection.len() < 2 {
                debug!("Skipping race with fewer than 2 entries");
                stats.races_skipped += 1;
                continue;
            }

            match model.fit_race(&race) {
                Ok(update) => {
                    stats.races_processed += 1;
                    self.observer.race_fitted(&race, &update);
                    if stats.races_processed % self.progress_every == 0 {
                        self.observer.progress(stats.races_processed);
                    }
                }
                Err(err) => {
                    let invalid = err
                        .downcast_ref::<ModelError>()
                        .map(|e| matches!(e, ModelError::InvalidRace { .. }))
                        .unwrap_or(false);
                    if invalid && !self.strict {
                        warn!("Rejected malformed race: {}", err);
                        stats.races_invalid += 1;
                        continue;
                    }
                    return Err(err);
                }
            }
        }

        stats.distinct_runners = model.store().len();
        Ok(stats)
    }
}
