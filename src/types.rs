//! Common types used throughout the rating model

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use skillratings::trueskill::TrueSkillRating;

use crate::error::{ModelError, Result};

/// Unique identifier for runners (horses)
pub type RunnerId = String;

/// Gaussian belief over a runner's latent skill: Normal(mu, sigma^2)
///
/// Immutable value type; a rating update produces a new `Belief` rather than
/// mutating the old one in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub mu: f64,
    pub sigma: f64,
}

impl Belief {
    pub fn new(mu: f64, sigma: f64) -> Self {
        Self { mu, sigma }
    }
}

impl From<TrueSkillRating> for Belief {
    fn from(rating: TrueSkillRating) -> Self {
        Self {
            mu: rating.rating,
            sigma: rating.uncertainty,
        }
    }
}

impl From<Belief> for TrueSkillRating {
    fn from(belief: Belief) -> Self {
        Self {
            rating: belief.mu,
            uncertainty: belief.sigma,
        }
    }
}

/// A single race result
///
/// `ranking` partitions the runners into finish-order groups, best group
/// first; members of the same group tied. `winners` is the set of runners
/// settled as winning the race, which may include ties for first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    pub selection: Vec<RunnerId>,
    pub ranking: Vec<Vec<RunnerId>>,
    pub winners: HashSet<RunnerId>,
}

impl Race {
    pub fn new(
        selection: Vec<RunnerId>,
        ranking: Vec<Vec<RunnerId>>,
        winners: HashSet<RunnerId>,
    ) -> Self {
        Self {
            selection,
            ranking,
            winners,
        }
    }

    /// Builds a race from a strict finish order (no ties), first past the post
    /// listed first and credited as the sole winner.
    pub fn from_finish_order<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<RunnerId>,
    {
        let selection: Vec<RunnerId> = order.into_iter().map(Into::into).collect();
        let ranking = selection.iter().map(|r| vec![r.clone()]).collect();
        let winners = selection.iter().take(1).cloned().collect();
        Self {
            selection,
            ranking,
            winners,
        }
    }

    /// Runners in selection order with duplicates removed.
    pub fn distinct_runners(&self) -> Vec<RunnerId> {
        let mut seen = HashSet::new();
        self.selection
            .iter()
            .filter(|r| seen.insert(r.as_str()))
            .cloned()
            .collect()
    }

    /// Checks the structural invariants: at least two distinct runners, no
    /// empty rank group, `ranking` covers the selection exactly once each,
    /// and `winners` is a subset of the selection.
    pub fn validate(&self) -> Result<()> {
        let distinct = self.distinct_runners();
        if distinct.len() < 2 {
            return Err(ModelError::InvalidRace {
                reason: format!("need at least 2 distinct runners, got {}", distinct.len()),
            }
            .into());
        }

        let mut ranked: HashSet<&RunnerId> = HashSet::new();
        for group in &self.ranking {
            if group.is_empty() {
                return Err(ModelError::InvalidRace {
                    reason: "empty rank group".to_string(),
                }
                .into());
            }
            for runner in group {
                if !ranked.insert(runner) {
                    return Err(ModelError::InvalidRace {
                        reason: format!("runner '{}' holds more than one rank", runner),
                    }
                    .into());
                }
            }
        }

        let selection: HashSet<&RunnerId> = self.selection.iter().collect();
        if let Some(extra) = ranked.difference(&selection).next() {
            return Err(ModelError::InvalidRace {
                reason: format!("ranked runner '{}' is not in the selection", extra),
            }
            .into());
        }
        if let Some(missing) = selection.difference(&ranked).next() {
            return Err(ModelError::InvalidRace {
                reason: format!("runner '{}' has no rank", missing),
            }
            .into());
        }

        for winner in &self.winners {
            if !selection.contains(winner) {
                return Err(ModelError::InvalidRace {
                    reason: format!("winner '{}' is not in the selection", winner),
                }
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_belief_rating_conversion_round_trip() {
        let belief = Belief::new(2.5, 6.25);
        let rating: TrueSkillRating = belief.into();
        assert_eq!(rating.rating, 2.5);
        assert_eq!(rating.uncertainty, 6.25);

        let back: Belief = rating.into();
        assert_eq!(back, belief);
    }

    #[test]
    fn test_from_finish_order_builds_singleton_groups() {
        let race = Race::from_finish_order(["alpha", "beta", "gamma"]);
        assert_eq!(race.selection.len(), 3);
        assert_eq!(race.ranking.len(), 3);
        assert_eq!(race.ranking[0], vec!["alpha".to_string()]);
        assert!(race.winners.contains("alpha"));
        assert_eq!(race.winners.len(), 1);
        assert!(race.validate().is_ok());
    }

    #[test]
    fn test_distinct_runners_preserves_first_occurrence_order() {
        let race = Race::new(
            vec![
                "a".to_string(),
                "b".to_string(),
                "a".to_string(),
                "c".to_string(),
            ],
            vec![],
            HashSet::new(),
        );
        assert_eq!(
            race.distinct_runners(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_validate_rejects_single_runner() {
        let race = Race::new(
            vec!["solo".to_string()],
            vec![vec!["solo".to_string()]],
            HashSet::new(),
        );
        assert!(race.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_rank_group() {
        let race = Race::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["a".to_string()], vec![], vec!["b".to_string()]],
            HashSet::new(),
        );
        let err = race.validate().unwrap_err();
        assert!(err.to_string().contains("empty rank group"));
    }

    #[test]
    fn test_validate_rejects_ranking_selection_mismatch() {
        let race = Race::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![vec!["a".to_string()], vec!["b".to_string()]],
            HashSet::new(),
        );
        assert!(race.validate().is_err());
    }

    #[test]
    fn test_validate_names_ghost_and_unranked_runners() {
        // A ranked runner missing from the selection is called out by name,
        // even when the counts happen to match
        let race = Race::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["a".to_string()], vec!["ghost".to_string()]],
            HashSet::new(),
        );
        let err = race.validate().unwrap_err();
        assert!(err.to_string().contains("ghost"));

        // So is a selected runner the ranking never places
        let race = Race::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![vec!["a".to_string()], vec!["b".to_string()]],
            HashSet::new(),
        );
        let err = race.validate().unwrap_err();
        assert!(err.to_string().contains("'c'"));
    }

    #[test]
    fn test_validate_rejects_duplicate_rank_entry() {
        let race = Race::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["a".to_string()], vec!["a".to_string(), "b".to_string()]],
            HashSet::new(),
        );
        let err = race.validate().unwrap_err();
        assert!(err.to_string().contains("more than one rank"));
    }

    #[test]
    fn test_validate_rejects_unknown_winner() {
        let mut race = Race::from_finish_order(["a", "b"]);
        race.winners.insert("ghost".to_string());
        let err = race.validate().unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_validate_accepts_tied_groups() {
        let race = Race::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![
                vec!["a".to_string()],
                vec!["b".to_string(), "c".to_string()],
            ],
            ["a".to_string()].into_iter().collect(),
        );
        assert!(race.validate().is_ok());
    }
}
