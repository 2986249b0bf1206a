//! Error types for structured error handling.
//!
//! This module provides [`LatticeError`], the single error type reported by
//! the lattice engine for contract violations detected at construction time
//! (malformed contracts, inconsistent tree data) and for budgets exceeded by
//! the time-boxed driver.
//!
//! Array-length mismatches inside the recursion are *not* represented here:
//! the driver is solely responsible for supplying correctly shaped arrays, so
//! a mismatch is a programming error and panics.

use thiserror::Error;

/// Categorised lattice errors.
///
/// # Variants
/// - `InvalidContract`: Strike, expiry or another contract scalar is out of range
/// - `InvalidParameter`: Any other rejected parameter
/// - `LayerCount`: Provider data does not describe `n` layers
/// - `LayerShape`: A layer array does not have `2i+1` entries
/// - `NegativeProbability`: A transition probability is below zero
/// - `ProbabilityRowSum`: A transition-probability row does not sum to one
/// - `StepLimitExceeded`: The tree is larger than the configured step budget
/// - `DeadlineExceeded`: The time budget ran out between two layers
/// - `InsufficientLayers`: Too few layers for the requested computation
///
/// # Examples
/// ```
/// use pricer_core::types::LatticeError;
///
/// let err = LatticeError::InvalidContract { name: "strike", value: -1.0 };
/// assert_eq!(format!("{}", err), "Invalid contract parameter 'strike': -1");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LatticeError {
    /// Contract scalar outside its admissible range.
    #[error("Invalid contract parameter '{name}': {value}")]
    InvalidContract {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// General parameter validation failure.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the problem
        message: String,
    },

    /// Per-layer data does not cover the expected number of layers.
    #[error("Expected {expected} layers of {what}, got {actual}")]
    LayerCount {
        /// Which per-layer quantity was short
        what: &'static str,
        /// Expected number of layers
        expected: usize,
        /// Supplied number of layers
        actual: usize,
    },

    /// A layer array has the wrong node count.
    #[error("Layer {layer} of {what} has {actual} nodes, expected {expected}")]
    LayerShape {
        /// Which per-layer quantity was malformed
        what: &'static str,
        /// Layer index
        layer: usize,
        /// Expected node count (2i+1)
        expected: usize,
        /// Supplied node count
        actual: usize,
    },

    /// Negative transition probability.
    #[error("Negative transition probability {value} at layer {layer}, node {node}")]
    NegativeProbability {
        /// Layer index
        layer: usize,
        /// Node index within the layer
        node: usize,
        /// Offending probability
        value: f64,
    },

    /// Transition probabilities of a node do not sum to one.
    #[error("Transition probabilities at layer {layer}, node {node} sum to {sum}")]
    ProbabilityRowSum {
        /// Layer index
        layer: usize,
        /// Node index within the layer
        node: usize,
        /// Actual row sum
        sum: f64,
    },

    /// Tree has more steps than the configured budget.
    #[error("Tree has {steps} steps, budget allows at most {max_steps}")]
    StepLimitExceeded {
        /// Steps in the tree
        steps: usize,
        /// Configured maximum
        max_steps: usize,
    },

    /// Wall-clock budget exhausted before reaching the root.
    #[error("Time budget of {budget_ms} ms exceeded with {remaining_layers} layers remaining")]
    DeadlineExceeded {
        /// Configured budget in milliseconds
        budget_ms: u64,
        /// Layers still to be computed when the walk stopped
        remaining_layers: usize,
    },

    /// Not enough layers for the requested computation.
    #[error("Computation requires at least {required} steps, tree has {available}")]
    InsufficientLayers {
        /// Minimum number of steps required
        required: usize,
        /// Steps available
        available: usize,
    },
}

impl LatticeError {
    /// Returns whether this error was raised by the time-boxed driver.
    #[inline]
    pub fn is_budget_error(&self) -> bool {
        matches!(
            self,
            LatticeError::StepLimitExceeded { .. } | LatticeError::DeadlineExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_contract_display() {
        let err = LatticeError::InvalidContract {
            name: "time_to_expiry",
            value: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid contract parameter 'time_to_expiry': 0"
        );
    }

    #[test]
    fn test_layer_shape_display() {
        let err = LatticeError::LayerShape {
            what: "state values",
            layer: 2,
            expected: 5,
            actual: 4,
        };
        assert!(err.to_string().contains("Layer 2 of state values has 4 nodes"));
    }

    #[test]
    fn test_probability_row_sum_display() {
        let err = LatticeError::ProbabilityRowSum {
            layer: 1,
            node: 0,
            sum: 0.9,
        };
        assert!(err.to_string().contains("sum to 0.9"));
    }

    #[test]
    fn test_budget_errors() {
        assert!(LatticeError::StepLimitExceeded {
            steps: 10,
            max_steps: 5
        }
        .is_budget_error());
        assert!(LatticeError::DeadlineExceeded {
            budget_ms: 1,
            remaining_layers: 3
        }
        .is_budget_error());
        assert!(!LatticeError::InsufficientLayers {
            required: 2,
            available: 1
        }
        .is_budget_error());
    }
}
