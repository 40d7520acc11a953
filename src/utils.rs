//! Utility functions for working with market odds

use crate::error::{ModelError, Result};

/// Convert decimal odds into normalized implied probabilities
///
/// Inverts each price and rescales so the field sums to one, which strips
/// the bookmaker overround. Useful for comparing model output against the
/// market.
pub fn implied_probabilities(odds: &[f64]) -> Result<Vec<f64>> {
    if odds.is_empty() {
        return Err(ModelError::InvalidInput {
            reason: "no odds given".to_string(),
        }
        .into());
    }
    if odds.iter().any(|o| !o.is_finite() || *o <= 0.0) {
        return Err(ModelError::InvalidInput {
            reason: "odds must be finite and positive".to_string(),
        }
        .into());
    }

    let inverses: Vec<f64> = odds.iter().map(|o| 1.0 / o).collect();
    let total: f64 = inverses.iter().sum();

    Ok(inverses.into_iter().map(|p| p / total).collect())
}
