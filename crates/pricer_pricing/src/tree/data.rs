//! Explicit per-layer tree data.

use std::borrow::Cow;

use pricer_core::math::{node_count, TransitionMatrix};
use pricer_core::types::LatticeError;

use super::provider::TreeProvider;
use super::{validate_discount_factor, validate_transition_matrix};

/// Default absolute tolerance on transition-probability row sums.
pub const DEFAULT_PROBABILITY_TOLERANCE: f64 = 1e-10;

/// Trinomial tree given layer by layer.
///
/// All structural checks happen in the constructor, so the induction hot
/// path never revalidates the data.
///
/// # Examples
/// ```
/// use pricer_core::math::TransitionMatrix;
/// use pricer_pricing::tree::{TreeProvider, TrinomialTreeData};
///
/// let tree = TrinomialTreeData::new(
///     vec![vec![100.0], vec![90.0, 100.0, 110.0]],
///     vec![TransitionMatrix::from_rows(&[[0.25, 0.5, 0.25]])],
///     vec![0.99],
/// )
/// .unwrap();
/// assert_eq!(tree.number_of_steps(), 1);
/// assert_eq!(tree.spot(), 100.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrinomialTreeData {
    state_values: Vec<Vec<f64>>,
    transition_probabilities: Vec<TransitionMatrix>,
    discount_factors: Vec<f64>,
}

impl TrinomialTreeData {
    /// Creates tree data, checking row sums against
    /// [`DEFAULT_PROBABILITY_TOLERANCE`].
    ///
    /// `state_values` holds layers `0..=n`; `transition_probabilities` and
    /// `discount_factors` hold layers `0..n`.
    ///
    /// # Errors
    /// - `LayerCount` if the per-layer vectors disagree on `n`
    /// - `LayerShape` if a layer does not have `2i+1` nodes or rows
    /// - `InvalidParameter` if a layer of state values is not ordered from
    ///   lowest to highest
    /// - `NegativeProbability` / `ProbabilityRowSum` for invalid rows
    /// - `InvalidParameter` for a non-positive or non-finite discount factor
    pub fn new(
        state_values: Vec<Vec<f64>>,
        transition_probabilities: Vec<TransitionMatrix>,
        discount_factors: Vec<f64>,
    ) -> Result<Self, LatticeError> {
        Self::with_tolerance(
            state_values,
            transition_probabilities,
            discount_factors,
            DEFAULT_PROBABILITY_TOLERANCE,
        )
    }

    /// Same as [`new`](Self::new) with an explicit row-sum tolerance.
    pub fn with_tolerance(
        state_values: Vec<Vec<f64>>,
        transition_probabilities: Vec<TransitionMatrix>,
        discount_factors: Vec<f64>,
        tolerance: f64,
    ) -> Result<Self, LatticeError> {
        if state_values.is_empty() {
            return Err(LatticeError::LayerCount {
                what: "state values",
                expected: 1,
                actual: 0,
            });
        }
        let steps = state_values.len() - 1;
        if transition_probabilities.len() != steps {
            return Err(LatticeError::LayerCount {
                what: "transition probabilities",
                expected: steps,
                actual: transition_probabilities.len(),
            });
        }
        if discount_factors.len() != steps {
            return Err(LatticeError::LayerCount {
                what: "discount factors",
                expected: steps,
                actual: discount_factors.len(),
            });
        }

        for (layer, states) in state_values.iter().enumerate() {
            check_shape("state values", layer, states.len())?;
            check_ordering(layer, states)?;
        }
        for (layer, matrix) in transition_probabilities.iter().enumerate() {
            check_shape("transition probabilities", layer, matrix.rows())?;
            validate_transition_matrix(matrix, layer, tolerance)?;
        }
        for &df in &discount_factors {
            validate_discount_factor(df)?;
        }

        Ok(Self {
            state_values,
            transition_probabilities,
            discount_factors,
        })
    }
}

fn check_shape(what: &'static str, layer: usize, actual: usize) -> Result<(), LatticeError> {
    let expected = node_count(layer);
    if actual == expected {
        Ok(())
    } else {
        Err(LatticeError::LayerShape {
            what,
            layer,
            expected,
            actual,
        })
    }
}

/// Rejects layers that are not non-decreasing. NaN states fail the check.
fn check_ordering(layer: usize, states: &[f64]) -> Result<(), LatticeError> {
    match states.windows(2).position(|w| !(w[0] <= w[1])) {
        None => Ok(()),
        Some(node) => Err(LatticeError::InvalidParameter {
            name: "state_values",
            message: format!(
                "layer {} is not ordered lowest to highest at node {}: {} > {}",
                layer,
                node,
                states[node],
                states[node + 1]
            ),
        }),
    }
}

impl TreeProvider for TrinomialTreeData {
    #[inline]
    fn number_of_steps(&self) -> usize {
        self.state_values.len() - 1
    }

    #[inline]
    fn spot(&self) -> f64 {
        self.state_values[0][0]
    }

    #[inline]
    fn state_values(&self, layer: usize) -> Cow<'_, [f64]> {
        Cow::Borrowed(&self.state_values[layer])
    }

    #[inline]
    fn transition_probability(&self, layer: usize) -> Cow<'_, TransitionMatrix> {
        Cow::Borrowed(&self.transition_probabilities[layer])
    }

    #[inline]
    fn discount_factor(&self, layer: usize) -> f64 {
        self.discount_factors[layer]
    }
}
