//! Model facade over the store, rater, and estimators

pub mod snapshot;

// Re-export commonly used types
pub use snapshot::{ModelSnapshot, RatingSnapshot};

use crate::error::Result;
use crate::fit::{BatchFitter, FitStats, RaceUpdate};
use crate::prob::{MonteCarloEstimator, TrapezoidEstimator, WinEstimator};
use crate::rating::{RatingStore, TrueSkillParams, TrueSkillRater};
use crate::types::{Belief, Race, RunnerId};

/// Skill model over a population of runners
///
/// Owns the hyperparameters, the TrueSkill rater, and the rating store.
/// Races are fitted strictly in event order; win probabilities are
/// evaluated against current beliefs, with unseen runners held at the
/// prior.
#[derive(Debug)]
pub struct HorseModel {
    params: TrueSkillParams,
    rater: TrueSkillRater,
    store: RatingStore,
}

impl HorseModel {
    /// Create a model with validated hyperparameters
    pub fn new(params: TrueSkillParams) -> Result<Self> {
        let rater = TrueSkillRater::new(params)?;
        let store = RatingStore::new(params.prior());

        Ok(Self {
            params,
            rater,
            store,
        })
    }

    pub fn params(&self) -> &TrueSkillParams {
        &self.params
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    /// Fit a single race, updating every participant's record
    ///
    /// Validation and rating both complete before the first record write,
    /// so a failed race leaves the store untouched.
    pub fn fit_race(&mut self, race: &Race) -> Result<RaceUpdate> {
        race.validate()?;

        let groups: Vec<Vec<Belief>> = race
            .ranking
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|runner| self.store.get_or_create(runner).belief)
                    .collect()
            })
            .collect();

        let rated = self.rater.rate(&groups)?;

        let mut update = RaceUpdate::new();
        for (group, new_beliefs) in race.ranking.iter().zip(rated.iter()) {
            for (runner, belief) in group.iter().zip(new_beliefs.iter()) {
                let won = race.winners.contains(runner);
                let record = self.store.apply_update(runner, *belief, won);
                update.insert(runner.clone(), record.clone());
            }
        }

        Ok(update)
    }

    /// Fit an ordered sequence of races with the default fitter
    pub fn fit<I>(&mut self, races: I) -> Result<FitStats>
    where
        I: IntoIterator<Item = Race>,
    {
        BatchFitter::new().fit(self, races)
    }

    /// Current beliefs in input order, seeding unseen runners with the prior
    pub fn ratings_for(&mut self, runners: &[RunnerId]) -> Vec<Belief> {
        self.store.ratings_for(runners)
    }

    /// Career run counts, zero for unseen runners
    pub fn run_counts(&self, runners: &[RunnerId]) -> Vec<u32> {
        runners
            .iter()
            .map(|r| self.store.get(r).map(|record| record.races_run).unwrap_or(0))
            .collect()
    }

    /// Win probabilities for a field under any estimator
    pub fn win_probabilities(
        &mut self,
        runners: &[RunnerId],
        estimator: &dyn WinEstimator,
    ) -> Result<Vec<f64>> {
        let beliefs = self.store.ratings_for(runners);
        estimator.win_probabilities(&beliefs)
    }

    /// Monte Carlo probability of each runner taking one of the first
    /// `top_n` places, over `samples` simulated races
    pub fn pwin_mc(
        &mut self,
        runners: &[RunnerId],
        samples: usize,
        top_n: usize,
    ) -> Result<Vec<f64>> {
        let estimator = MonteCarloEstimator::new(samples).with_top_n(top_n);
        self.win_probabilities(runners, &estimator)
    }

    /// Deterministic outright-win probabilities by trapezoidal quadrature
    pub fn pwin_trapz(&mut self, runners: &[RunnerId]) -> Result<Vec<f64>> {
        let estimator = TrapezoidEstimator::default();
        self.win_probabilities(runners, &estimator)
    }

    /// Snapshot of the hyperparameters and every record, sorted by runner
    /// for deterministic output
    pub fn snapshot(&self) -> ModelSnapshot {
        let mut ratings: Vec<RatingSnapshot> =
            self.store.records().map(RatingSnapshot::from).collect();
        ratings.sort_by(|a, b| a.runner.cmp(&b.runner));

        ModelSnapshot {
            ts: self.params,
            ratings,
        }
    }

    /// Rebuild a model from a snapshot
    ///
    /// The restored model produces bit-identical updates to one that was
    /// never serialized, given the same subsequent races.
    pub fn from_snapshot(snapshot: ModelSnapshot) -> Result<Self> {
        snapshot.validate()?;

        let mut model = Self::new(snapshot.ts)?;
        for entry in snapshot.ratings {
            model.store.insert(entry.into());
        }

        Ok(model)
    }
}
