//! Win-probability estimation over runner beliefs
//!
//! Two interchangeable estimators map a field of beliefs to win
//! probabilities: Monte Carlo simulation and trapezoidal quadrature. Both
//! consume the same inputs and should approximately agree, which makes
//! them useful as cross-checks on each other.

pub mod monte_carlo;
pub mod quadrature;

// Re-export commonly used types
pub use monte_carlo::MonteCarloEstimator;
pub use quadrature::TrapezoidEstimator;

use statrs::distribution::Normal;

use crate::error::{ModelError, Result};
use crate::types::Belief;

/// Trait for converting a field of beliefs into win probabilities
pub trait WinEstimator: Send + Sync {
    /// Probability of each runner finishing inside the scored places,
    /// in input order
    fn win_probabilities(&self, beliefs: &[Belief]) -> Result<Vec<f64>>;
}

/// Validate a field of beliefs and build their distributions
///
/// A belief with `sigma == 0` is a Dirac spike rather than a distribution;
/// it is rejected outright instead of being clamped to a floor.
pub(crate) fn field_distributions(beliefs: &[Belief]) -> Result<Vec<Normal>> {
    if beliefs.is_empty() {
        return Err(ModelError::InvalidInput {
            reason: "no runners to evaluate".to_string(),
        }
        .into());
    }

    let mut normals = Vec::with_capacity(beliefs.len());
    for (i, belief) in beliefs.iter().enumerate() {
        if !belief.mu.is_finite() || !belief.sigma.is_finite() || belief.sigma <= 0.0 {
            return Err(ModelError::InvalidInput {
                reason: format!(
                    "runner {} has invalid belief (mu {}, sigma {}); sigma must be finite and positive",
                    i, belief.mu, belief.sigma
                ),
            }
            .into());
        }

        let normal = Normal::new(belief.mu, belief.sigma).map_err(|e| ModelError::Numerical {
            reason: format!("distribution for runner {}: {}", i, e),
        })?;
        normals.push(normal);
    }

    Ok(normals)
}
