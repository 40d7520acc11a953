//! TrueSkill rating system implementation
//!
//! This module provides the rating update over ranked race outcomes using
//! the TrueSkill factor-graph algorithm from the skillratings crate.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use skillratings::trueskill::{
    expected_score, trueskill_multi_team, TrueSkillConfig, TrueSkillRating,
};
use skillratings::MultiTeamOutcome;

use crate::error::{ModelError, Result};
use crate::types::Belief;

/// Model hyperparameters for the TrueSkill update
///
/// `mu` and `sigma` seed the prior belief for unseen runners; `beta` is the
/// performance noise scale (a one-beta skill gap is roughly an 80% win
/// expectancy); `tau` is the per-race dynamics factor added to uncertainty
/// before each comparison; `draw_probability` is the prior chance that two
/// equally matched runners dead-heat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrueSkillParams {
    pub mu: f64,
    pub sigma: f64,
    pub beta: f64,
    pub tau: f64,
    pub draw_probability: f64,
}

impl Default for TrueSkillParams {
    fn default() -> Self {
        Self {
            mu: 0.0,
            sigma: 8.0,
            beta: 4.0,
            tau: 0.1,
            draw_probability: 0.1,
        }
    }
}

impl TrueSkillParams {
    /// Validate hyperparameter values
    pub fn validate(&self) -> Result<()> {
        if !self.mu.is_finite() {
            return Err(ModelError::Configuration {
                message: "Prior mean must be finite".to_string(),
            }
            .into());
        }

        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(ModelError::Configuration {
                message: "Prior sigma must be positive".to_string(),
            }
            .into());
        }

        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(ModelError::Configuration {
                message: "Beta must be positive".to_string(),
            }
            .into());
        }

        if !self.tau.is_finite() || self.tau < 0.0 {
            return Err(ModelError::Configuration {
                message: "Tau must be non-negative".to_string(),
            }
            .into());
        }

        if !self.draw_probability.is_finite()
            || self.draw_probability < 0.0
            || self.draw_probability >= 1.0
        {
            return Err(ModelError::Configuration {
                message: "Draw probability must be in [0, 1)".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Prior belief assigned to runners with no race history
    pub fn prior(&self) -> Belief {
        Belief::new(self.mu, self.sigma)
    }

    /// Core algorithm configuration for the skillratings crate
    pub fn to_config(&self) -> TrueSkillConfig {
        TrueSkillConfig {
            draw_probability: self.draw_probability,
            beta: self.beta,
            default_dynamics: self.tau,
        }
    }
}

/// TrueSkill rating engine over rank groups
#[derive(Debug)]
pub struct TrueSkillRater {
    params: TrueSkillParams,
    config: TrueSkillConfig,
}

impl TrueSkillRater {
    /// Create a new rater, validating the hyperparameters
    pub fn new(params: TrueSkillParams) -> Result<Self> {
        params.validate()?;
        let config = params.to_config();

        Ok(Self { params, config })
    }

    pub fn params(&self) -> &TrueSkillParams {
        &self.params
    }

    /// Prior belief for runners with no race history
    pub fn prior(&self) -> Belief {
        self.params.prior()
    }

    /// Recompute beliefs for one race outcome
    ///
    /// `groups` holds one entry per finishing position, best first; runners
    /// in the same group dead-heated. Returns new beliefs in the same group
    /// shape and order.
    ///
    /// The factor graph chains tied teams in listing order, so a raw solve
    /// skews dead-heat posteriors toward the ends of the chain. To keep
    /// results independent of how the caller lists a dead heat, each tied
    /// group is rated in a canonical member order and every member's
    /// posterior is averaged over the group's rotations; equal priors come
    /// out equal.
    pub fn rate(&self, groups: &[Vec<Belief>]) -> Result<Vec<Vec<Belief>>> {
        let total: usize = groups.iter().map(Vec::len).sum();
        if groups.is_empty() || total < 2 {
            return Err(ModelError::InvalidRace {
                reason: format!("need at least 2 runners to rate, got {}", total),
            }
            .into());
        }
        for group in groups {
            if group.is_empty() {
                return Err(ModelError::InvalidRace {
                    reason: "empty rank group".to_string(),
                }
                .into());
            }
        }

        if groups.iter().all(|group| group.len() == 1) {
            return self.rate_ordered(groups);
        }

        // Canonical member order inside each dead-heat group, remembering
        // where each member came from
        let mut orders: Vec<Vec<usize>> = Vec::with_capacity(groups.len());
        let mut canonical: Vec<Vec<Belief>> = Vec::with_capacity(groups.len());
        for group in groups {
            let mut order: Vec<usize> = (0..group.len()).collect();
            order.sort_by(|&x, &y| {
                (group[x].mu, group[x].sigma)
                    .partial_cmp(&(group[y].mu, group[y].sigma))
                    .unwrap_or(Ordering::Equal)
            });
            canonical.push(order.iter().map(|&i| group[i]).collect());
            orders.push(order);
        }

        let mut averaged = self.rate_ordered(&canonical)?;

        for (gi, members) in canonical.iter().enumerate() {
            let n = members.len();
            if n < 2 {
                continue;
            }

            let mut mu_sums = vec![0.0; n];
            let mut sigma_sums = vec![0.0; n];
            for (m, belief) in averaged[gi].iter().enumerate() {
                mu_sums[m] += belief.mu;
                sigma_sums[m] += belief.sigma;
            }

            for shift in 1..n {
                let mut rotated = canonical.clone();
                rotated[gi] = (0..n).map(|pos| members[(pos + shift) % n]).collect();
                let rated = self.rate_ordered(&rotated)?;
                for (pos, belief) in rated[gi].iter().enumerate() {
                    let m = (pos + shift) % n;
                    mu_sums[m] += belief.mu;
                    sigma_sums[m] += belief.sigma;
                }
            }

            let scale = 1.0 / n as f64;
            averaged[gi] = (0..n)
                .map(|m| Belief::new(mu_sums[m] * scale, sigma_sums[m] * scale))
                .collect();
        }

        // Back to the caller's listing order
        let mut rebuilt: Vec<Vec<Belief>> = Vec::with_capacity(groups.len());
        for (gi, order) in orders.iter().enumerate() {
            let mut out = vec![Belief::new(0.0, 0.0); order.len()];
            for (canon_pos, &listed_pos) in order.iter().enumerate() {
                out[listed_pos] = averaged[gi][canon_pos];
            }
            rebuilt.push(out);
        }

        Ok(rebuilt)
    }

    /// One factor-graph evaluation in the given member order
    ///
    /// Each runner enters the graph as a single-member team whose outcome
    /// rank is its group index.
    fn rate_ordered(&self, groups: &[Vec<Belief>]) -> Result<Vec<Vec<Belief>>> {
        let total: usize = groups.iter().map(Vec::len).sum();

        let mut teams_with_outcomes = Vec::with_capacity(total);
        for (position, group) in groups.iter().enumerate() {
            let outcome = MultiTeamOutcome::new(position + 1);
            for belief in group {
                let team = vec![TrueSkillRating::from(*belief)];
                teams_with_outcomes.push((team, outcome));
            }
        }

        let teams_refs: Vec<(&[TrueSkillRating], MultiTeamOutcome)> = teams_with_outcomes
            .iter()
            .map(|(team, outcome)| (team.as_slice(), *outcome))
            .collect();

        let rated = trueskill_multi_team(&teams_refs, &self.config);
        if rated.len() != total {
            return Err(ModelError::Numerical {
                reason: format!(
                    "rating engine returned {} results for {} runners",
                    rated.len(),
                    total
                ),
            }
            .into());
        }

        // Mirror the input group shape on the way back out
        let mut rebuilt = Vec::with_capacity(groups.len());
        let mut offset = 0;
        for group in groups {
            let mut new_group = Vec::with_capacity(group.len());
            for team in &rated[offset..offset + group.len()] {
                let rating = team.first().ok_or_else(|| ModelError::Numerical {
                    reason: "empty team in rating result".to_string(),
                })?;
                new_group.push(Belief::from(*rating));
            }
            offset += group.len();
            rebuilt.push(new_group);
        }

        Ok(rebuilt)
    }

    /// Expected score of `a` against `b` in a head-to-head, as a pair
    /// summing to 1.0
    pub fn expected_head_to_head(&self, a: &Belief, b: &Belief) -> (f64, f64) {
        expected_score(&(*a).into(), &(*b).into(), &self.config)
    }
}
