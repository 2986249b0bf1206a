//! Trinomial tree providers.
//!
//! The engine consumes a tree only through [`TreeProvider`]. Two providers
//! are included:
//!
//! - [`TrinomialTreeData`]: explicit per-layer state values, transition
//!   matrices and discount factors, validated once at construction
//! - [`UniformTrinomialTree`]: geometric node placement with a single
//!   probability triple and discount factor for every layer

mod data;
mod provider;
mod uniform;

pub use data::{TrinomialTreeData, DEFAULT_PROBABILITY_TOLERANCE};
pub use provider::TreeProvider;
pub use uniform::UniformTrinomialTree;

use pricer_core::math::TransitionMatrix;
use pricer_core::types::LatticeError;

/// Checks that every row of `matrix` is a probability distribution.
pub(crate) fn validate_transition_matrix(
    matrix: &TransitionMatrix,
    layer: usize,
    tolerance: f64,
) -> Result<(), LatticeError> {
    for (node, row) in matrix.iter_rows().enumerate() {
        if let Some(&value) = row.iter().find(|p| !(**p >= 0.0)) {
            return Err(LatticeError::NegativeProbability { layer, node, value });
        }
        let sum: f64 = row.iter().sum();
        if !((sum - 1.0).abs() <= tolerance) {
            return Err(LatticeError::ProbabilityRowSum { layer, node, sum });
        }
    }
    Ok(())
}

/// Checks that a discount factor is positive and finite.
pub(crate) fn validate_discount_factor(discount_factor: f64) -> Result<(), LatticeError> {
    if discount_factor > 0.0 && discount_factor.is_finite() {
        Ok(())
    } else {
        Err(LatticeError::InvalidParameter {
            name: "discount_factor",
            message: format!("must be positive and finite, got {}", discount_factor),
        })
    }
}
