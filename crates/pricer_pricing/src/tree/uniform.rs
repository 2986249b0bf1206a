//! Geometric tree with layer-independent probabilities and discounting.

use std::borrow::Cow;

use pricer_core::math::{node_count, TransitionMatrix, UniformProbabilities};
use pricer_core::traits::GeometricLayer;
use pricer_core::types::LatticeError;

use super::data::DEFAULT_PROBABILITY_TOLERANCE;
use super::provider::TreeProvider;
use super::{validate_discount_factor, validate_transition_matrix};

/// Trinomial tree with node `k` of layer `i` at
/// `spot * down_factor^(i-k) * middle_factor^k`, one probability triple for
/// every node and one discount factor for every step.
///
/// State values and matrices are rebuilt on request, so memory stays
/// constant in the number of steps.
///
/// # Examples
/// ```
/// use pricer_core::math::UniformProbabilities;
/// use pricer_pricing::tree::{TreeProvider, UniformTrinomialTree};
///
/// let up = 1.1_f64;
/// let tree = UniformTrinomialTree::new(
///     100.0,
///     1.0 / up,
///     1.0,
///     2,
///     UniformProbabilities::new(0.25, 0.5, 0.25),
///     0.99,
/// )
/// .unwrap();
/// let layer = tree.state_values(1);
/// assert_eq!(layer.len(), 3);
/// assert_eq!(layer[1], 100.0);
/// assert!((layer[2] - 110.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformTrinomialTree {
    geometry: GeometricLayer,
    number_of_steps: usize,
    probabilities: UniformProbabilities,
    discount_factor: f64,
}

impl UniformTrinomialTree {
    /// Creates a uniform tree, checking the probability triple against
    /// [`DEFAULT_PROBABILITY_TOLERANCE`].
    ///
    /// # Errors
    /// - `InvalidParameter` for a non-positive or non-finite spot, factor or
    ///   discount factor, or for `middle_factor < down_factor` (layers would
    ///   run from highest to lowest)
    /// - `NegativeProbability` / `ProbabilityRowSum` for an invalid triple
    pub fn new(
        spot: f64,
        down_factor: f64,
        middle_factor: f64,
        number_of_steps: usize,
        probabilities: UniformProbabilities,
        discount_factor: f64,
    ) -> Result<Self, LatticeError> {
        Self::with_tolerance(
            GeometricLayer::new(spot, down_factor, middle_factor),
            number_of_steps,
            probabilities,
            discount_factor,
            DEFAULT_PROBABILITY_TOLERANCE,
        )
    }

    /// Same as [`new`](Self::new) with an explicit geometry and row-sum
    /// tolerance.
    pub fn with_tolerance(
        geometry: GeometricLayer,
        number_of_steps: usize,
        probabilities: UniformProbabilities,
        discount_factor: f64,
        tolerance: f64,
    ) -> Result<Self, LatticeError> {
        for (name, value) in [
            ("spot", geometry.spot),
            ("down_factor", geometry.down_factor),
            ("middle_factor", geometry.middle_factor),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(LatticeError::InvalidParameter {
                    name,
                    message: format!("must be positive and finite, got {}", value),
                });
            }
        }
        // Node ratio is middle / down; equal factors give a flat layer
        if geometry.middle_factor < geometry.down_factor {
            return Err(LatticeError::InvalidParameter {
                name: "middle_factor",
                message: format!(
                    "must not be below down_factor {} or layers descend, got {}",
                    geometry.down_factor, geometry.middle_factor
                ),
            });
        }
        validate_transition_matrix(&TransitionMatrix::uniform(1, probabilities), 0, tolerance)?;
        validate_discount_factor(discount_factor)?;

        Ok(Self {
            geometry,
            number_of_steps,
            probabilities,
            discount_factor,
        })
    }

    /// Returns the node placement.
    #[inline]
    pub fn geometry(&self) -> &GeometricLayer {
        &self.geometry
    }

    /// Returns the probability triple used at every node.
    #[inline]
    pub fn probabilities(&self) -> UniformProbabilities {
        self.probabilities
    }
}

impl TreeProvider for UniformTrinomialTree {
    #[inline]
    fn number_of_steps(&self) -> usize {
        self.number_of_steps
    }

    #[inline]
    fn spot(&self) -> f64 {
        self.geometry.spot
    }

    fn state_values(&self, layer: usize) -> Cow<'_, [f64]> {
        Cow::Owned(self.geometry.state_values(layer))
    }

    fn transition_probability(&self, layer: usize) -> Cow<'_, TransitionMatrix> {
        Cow::Owned(TransitionMatrix::uniform(
            node_count(layer),
            self.probabilities,
        ))
    }

    #[inline]
    fn discount_factor(&self, _layer: usize) -> f64 {
        self.discount_factor
    }
}
