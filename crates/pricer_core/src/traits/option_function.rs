//! Option-function contracts for trinomial backward induction.
//!
//! Two capability sets are defined here:
//!
//! - [`OptionFunction`]: payoff at expiry plus the layer-to-layer
//!   continuation step for contracts whose node value is a single `f64`. The
//!   continuation step has a default (the discounted risk-neutral
//!   expectation) that early-exercise and barrier contracts override.
//! - [`LatticeFunction`]: the general capability set the backward-induction
//!   driver is written against. Its node type is free, so path-dependent
//!   contracts can carry auxiliary state next to the option value. Every
//!   [`OptionFunction`] is a [`LatticeFunction`] with `Node = f64`.
//!
//! Both extend [`ContractTerms`], which holds the immutable contract scalars.

use crate::math::{
    discounted_expectation, geometric_state_values, node_count, TransitionMatrix,
    UniformProbabilities,
};

/// Immutable contract scalars shared by every option function.
pub trait ContractTerms {
    /// Strike of the contract (positive).
    fn strike(&self) -> f64;

    /// Time to expiry in years (positive).
    fn time_to_expiry(&self) -> f64;
}

/// Geometric node placement of a uniform trinomial tree.
///
/// Node `k` of layer `i` sits at `spot * down_factor^(i-k) * middle_factor^k`.
///
/// # Examples
/// ```
/// use pricer_core::traits::GeometricLayer;
///
/// let geometry = GeometricLayer::new(100.0, 0.5, 1.0);
/// assert_eq!(geometry.state_values(1), vec![50.0, 100.0, 200.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricLayer {
    /// Spot at the root node
    pub spot: f64,
    /// Down factor
    pub down_factor: f64,
    /// Middle factor
    pub middle_factor: f64,
}

impl GeometricLayer {
    /// Creates a geometric placement.
    #[inline]
    pub fn new(spot: f64, down_factor: f64, middle_factor: f64) -> Self {
        Self {
            spot,
            down_factor,
            middle_factor,
        }
    }

    /// State values of layer `layer`, recomputed from scratch.
    #[inline]
    pub fn state_values(&self, layer: usize) -> Vec<f64> {
        geometric_state_values(self.spot, self.down_factor, self.middle_factor, layer)
    }
}

/// Payoff and continuation rules of a contract valued on a trinomial tree.
///
/// Implementors supply [`payoff_at_expiry`](OptionFunction::payoff_at_expiry).
/// Path-independent contracts keep the default
/// [`next_layer_values`](OptionFunction::next_layer_values); contracts with
/// early exercise or barriers override it and usually call
/// [`discounted_expectation`] for the continuation part.
///
/// # Shape contract
///
/// For layer `i`, `state_values` has `2i+1` entries and `values` (layer
/// `i+1`) has `2i+3`. The driver guarantees this; implementations may panic
/// on mismatch.
///
/// # Examples
/// ```
/// use pricer_core::traits::{ContractTerms, OptionFunction};
///
/// struct Forward {
///     strike: f64,
/// }
///
/// impl ContractTerms for Forward {
///     fn strike(&self) -> f64 {
///         self.strike
///     }
///     fn time_to_expiry(&self) -> f64 {
///         1.0
///     }
/// }
///
/// impl OptionFunction for Forward {
///     fn payoff_at_expiry(&self, state_values: &[f64], _number_of_steps: usize) -> Vec<f64> {
///         state_values.iter().map(|s| s - self.strike).collect()
///     }
/// }
///
/// let forward = Forward { strike: 100.0 };
/// assert_eq!(forward.payoff_at_expiry(&[90.0, 100.0, 110.0], 1), vec![-10.0, 0.0, 10.0]);
/// ```
pub trait OptionFunction: ContractTerms {
    /// Payoff per node of the terminal layer.
    ///
    /// `state_values` has `2 * number_of_steps + 1` entries and so does the
    /// result.
    fn payoff_at_expiry(&self, state_values: &[f64], number_of_steps: usize) -> Vec<f64>;

    /// Payoff at expiry on a geometric tree.
    ///
    /// Rebuilds the terminal state values as
    /// `spot * down_factor^(n-k) * middle_factor^k` and delegates to
    /// [`payoff_at_expiry`](OptionFunction::payoff_at_expiry).
    fn payoff_at_expiry_geometric(
        &self,
        geometry: &GeometricLayer,
        number_of_steps: usize,
    ) -> Vec<f64> {
        let state_values = geometry.state_values(number_of_steps);
        self.payoff_at_expiry(&state_values, number_of_steps)
    }

    /// Option values of layer `layer` from those of layer `layer + 1`.
    ///
    /// The default is the discounted expectation over the three successors
    /// using the per-node probabilities of `transition_probability`. Override
    /// for path dependence.
    fn next_layer_values(
        &self,
        discount_factor: f64,
        transition_probability: &TransitionMatrix,
        _state_values: &[f64],
        values: &[f64],
        layer: usize,
    ) -> Vec<f64> {
        discounted_expectation(discount_factor, transition_probability, values, layer)
    }

    /// Continuation step on a geometric tree with uniform probabilities.
    ///
    /// Broadcasts `probabilities` to every node, rebuilds the layer's state
    /// values geometrically and delegates to
    /// [`next_layer_values`](OptionFunction::next_layer_values), so overrides
    /// of the matrix form apply here as well.
    fn next_layer_values_uniform(
        &self,
        discount_factor: f64,
        probabilities: UniformProbabilities,
        values: &[f64],
        geometry: &GeometricLayer,
        layer: usize,
    ) -> Vec<f64> {
        let transition_probability = TransitionMatrix::uniform(node_count(layer), probabilities);
        let state_values = geometry.state_values(layer);
        self.next_layer_values(
            discount_factor,
            &transition_probability,
            &state_values,
            values,
            layer,
        )
    }
}

/// Capability set driven by the backward-induction engine.
///
/// `Node` is the per-node value carried from layer to layer. It is `f64` for
/// every [`OptionFunction`]; path-dependent contracts widen it to a tuple of
/// option value and auxiliary state.
pub trait LatticeFunction: ContractTerms {
    /// Value stored at each node.
    type Node: Clone + Send + Sync;

    /// Terminal-layer nodes from the terminal state values.
    fn expiry_nodes(&self, state_values: &[f64], number_of_steps: usize) -> Vec<Self::Node>;

    /// Nodes of layer `layer` from the nodes of layer `layer + 1`.
    fn roll_back(
        &self,
        discount_factor: f64,
        transition_probability: &TransitionMatrix,
        state_values: &[f64],
        nodes: &[Self::Node],
        layer: usize,
    ) -> Vec<Self::Node>;

    /// Present value represented by a node.
    fn node_value(&self, node: &Self::Node) -> f64;
}

impl<F: OptionFunction> LatticeFunction for F {
    type Node = f64;

    #[inline]
    fn expiry_nodes(&self, state_values: &[f64], number_of_steps: usize) -> Vec<f64> {
        self.payoff_at_expiry(state_values, number_of_steps)
    }

    #[inline]
    fn roll_back(
        &self,
        discount_factor: f64,
        transition_probability: &TransitionMatrix,
        state_values: &[f64],
        nodes: &[f64],
        layer: usize,
    ) -> Vec<f64> {
        self.next_layer_values(
            discount_factor,
            transition_probability,
            state_values,
            nodes,
            layer,
        )
    }

    #[inline]
    fn node_value(&self, node: &f64) -> f64 {
        *node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Pays the terminal state value itself.
    struct Underlying;

    impl ContractTerms for Underlying {
        fn strike(&self) -> f64 {
            1.0
        }
        fn time_to_expiry(&self) -> f64 {
            1.0
        }
    }

    impl OptionFunction for Underlying {
        fn payoff_at_expiry(&self, state_values: &[f64], _number_of_steps: usize) -> Vec<f64> {
            state_values.to_vec()
        }
    }

    /// Floors the continuation value at one.
    struct Floored;

    impl ContractTerms for Floored {
        fn strike(&self) -> f64 {
            1.0
        }
        fn time_to_expiry(&self) -> f64 {
            1.0
        }
    }

    impl OptionFunction for Floored {
        fn payoff_at_expiry(&self, state_values: &[f64], _number_of_steps: usize) -> Vec<f64> {
            vec![0.0; state_values.len()]
        }

        fn next_layer_values(
            &self,
            discount_factor: f64,
            transition_probability: &TransitionMatrix,
            _state_values: &[f64],
            values: &[f64],
            layer: usize,
        ) -> Vec<f64> {
            discounted_expectation(discount_factor, transition_probability, values, layer)
                .into_iter()
                .map(|v| v.max(1.0))
                .collect()
        }
    }

    #[test]
    fn test_geometric_payoff_delegates_to_array_form() {
        let geometry = GeometricLayer::new(100.0, 0.9, 1.0);
        let payoff = Underlying.payoff_at_expiry_geometric(&geometry, 2);
        assert_eq!(payoff, geometry.state_values(2));
        assert_eq!(payoff.len(), 5);
    }

    #[test]
    fn test_default_next_layer_values() {
        let probs = TransitionMatrix::uniform(1, UniformProbabilities::new(0.25, 0.5, 0.25));
        let out = Underlying.next_layer_values(0.99, &probs, &[100.0], &[9.0, 10.0, 12.0], 0);
        assert_relative_eq!(out[0], 10.1475, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_overload_matches_matrix_form() {
        let geometry = GeometricLayer::new(100.0, 0.95, 1.0);
        let probs = UniformProbabilities::new(0.2, 0.55, 0.25);
        let values: Vec<f64> = (0..7).map(|k| k as f64 * 1.5).collect();

        let uniform = Underlying.next_layer_values_uniform(0.98, probs, &values, &geometry, 2);
        let matrix = Underlying.next_layer_values(
            0.98,
            &TransitionMatrix::uniform(5, probs),
            &geometry.state_values(2),
            &values,
            2,
        );
        assert_eq!(uniform, matrix);
    }

    #[test]
    fn test_uniform_overload_reaches_override() {
        let geometry = GeometricLayer::new(100.0, 0.95, 1.0);
        let out = Floored.next_layer_values_uniform(
            1.0,
            UniformProbabilities::middle_only(),
            &[0.0, 0.0, 0.0],
            &geometry,
            0,
        );
        assert_eq!(out, vec![1.0]);
    }

    #[test]
    fn test_blanket_lattice_function() {
        let nodes = Underlying.expiry_nodes(&[1.0, 2.0, 3.0], 1);
        let probs = TransitionMatrix::uniform(1, UniformProbabilities::middle_only());
        let root = Underlying.roll_back(0.5, &probs, &[2.0], &nodes, 0);
        assert_eq!(Underlying.node_value(&root[0]), 1.0);
    }
}
