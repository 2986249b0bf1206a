//! Arithmetic-average Asian option on a trinomial tree.
//!
//! A recombining tree forgets the path, so the running average cannot be a
//! function of the node alone. Each node therefore carries a grid of
//! representative averages together with the option value for each of them
//! (the node element widens from `f64` to [`AsianNode`]).
//!
//! The average is sampled at every layer including the root, so a path
//! reaching layer `i` has `i + 1` observations. Stepping back from layer
//! `i + 1` to layer `i`, an average `a` at a node moves to
//! `(a * (i + 1) + S') / (i + 2)` on the successor with state `S'`; the
//! successor's value there is read off its grid by linear interpolation,
//! with flat extrapolation outside the grid.
//!
//! A node's grid spans the smallest and largest running average over the
//! paths reaching it. With a unit middle factor every earlier layer is a
//! sub-range of the node's own layer, and the extreme paths are read off
//! that layer directly. On drifting trees the bounds are approximate and
//! averages falling outside them are extrapolated flat.

use pricer_core::math::{assert_layer_shape, node_count, TransitionMatrix, PARALLEL_MIN_NODES};
use pricer_core::traits::{ContractTerms, LatticeFunction};
use rayon::prelude::*;

use super::error::InstrumentError;
use super::params::OptionParams;
use super::payoff::PutCall;

/// Default number of representative averages per node.
pub const DEFAULT_AVERAGE_POINTS: usize = 41;

/// Node state of an Asian option: the node's spot and the option value on
/// its representative-average grid `[lower, upper]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AsianNode {
    /// State value of the node
    pub spot: f64,
    /// Smallest representative average
    pub lower: f64,
    /// Largest representative average
    pub upper: f64,
    /// Option value for each grid average, evenly spaced from `lower` to `upper`
    pub values: Vec<f64>,
}

impl AsianNode {
    /// Grid average `k`.
    #[inline]
    pub fn average(&self, k: usize) -> f64 {
        average_at(self.lower, self.upper, self.values.len(), k)
    }

    /// Option value for running average `average`.
    ///
    /// Linear between grid points, flat beyond either end; a degenerate grid
    /// (`lower == upper`) returns its single level.
    pub fn value_at(&self, average: f64) -> f64 {
        debug_assert!(
            self.lower <= self.upper,
            "average grid [{}, {}] is inverted",
            self.lower,
            self.upper
        );
        let width = self.upper - self.lower;
        let last = self.values.len() - 1;
        if last == 0 || width <= f64::EPSILON * self.upper.abs().max(1.0) {
            return self.values[0];
        }
        let x = ((average - self.lower) / width * last as f64).clamp(0.0, last as f64);
        let i = (x.floor() as usize).min(last - 1);
        let w = x - i as f64;
        self.values[i] * (1.0 - w) + self.values[i + 1] * w
    }
}

/// Extreme running averages over the paths reaching node `j` of `layer`.
///
/// `t` layers before `layer`, the lowest reachable node maps to index
/// `max(t, j - t)` of `state_values` and the highest to
/// `min(2 * layer - t, j + t)`. The bounds are returned in increasing order
/// even if a provider lays a layer out from highest to lowest.
fn average_bounds(state_values: &[f64], layer: usize, j: usize) -> (f64, f64) {
    let (mut low, mut high) = (0.0, 0.0);
    for t in 0..=layer {
        low += state_values[t.max(j.saturating_sub(t))];
        high += state_values[(2 * layer - t).min(j + t)];
    }
    let observations = (layer + 1) as f64;
    let (low, high) = (low / observations, high / observations);
    (low.min(high), low.max(high))
}

#[inline]
fn average_at(lower: f64, upper: f64, points: usize, k: usize) -> f64 {
    if points <= 1 {
        lower
    } else {
        lower + (upper - lower) * k as f64 / (points - 1) as f64
    }
}

/// Fixed-strike arithmetic Asian call or put, European exercise.
///
/// Pays `max(A - K, 0)` (call) or `max(K - A, 0)` (put) where `A` is the
/// arithmetic average of the state values visited on layers `0..=n`.
///
/// # Examples
/// ```
/// use pricer_core::traits::LatticeFunction;
/// use pricer_models::instruments::{AsianArithmeticOption, OptionParams, PutCall};
///
/// let params = OptionParams::new(100.0, 1.0).unwrap();
/// let asian = AsianArithmeticOption::new(params, PutCall::Call, 11).unwrap();
///
/// // Two observations: the root at 100 and the terminal state
/// let nodes = asian.expiry_nodes(&[90.0, 100.0, 110.0], 1);
/// assert_eq!(nodes.len(), 3);
/// assert_eq!(nodes[2].lower, 105.0);
/// assert_eq!(nodes[2].upper, 105.0);
/// assert_eq!(nodes[2].values[0], 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsianArithmeticOption {
    params: OptionParams,
    put_call: PutCall,
    average_points: usize,
}

impl AsianArithmeticOption {
    /// Creates an arithmetic Asian option with `average_points`
    /// representative averages per node.
    ///
    /// # Errors
    /// `InvalidParameter` if `average_points < 2`.
    pub fn new(
        params: OptionParams,
        put_call: PutCall,
        average_points: usize,
    ) -> Result<Self, InstrumentError> {
        if average_points < 2 {
            return Err(InstrumentError::InvalidParameter {
                message: format!("average_points must be at least 2, got {}", average_points),
            });
        }
        Ok(Self {
            params,
            put_call,
            average_points,
        })
    }

    /// Returns the number of representative averages per node.
    #[inline]
    pub fn average_points(&self) -> usize {
        self.average_points
    }

    /// Returns the payoff direction.
    #[inline]
    pub fn put_call(&self) -> PutCall {
        self.put_call
    }

    /// Node `j` of `layer` with its grid bounds and no values yet.
    fn grid_node(&self, state_values: &[f64], layer: usize, j: usize) -> AsianNode {
        let (lower, upper) = average_bounds(state_values, layer, j);
        AsianNode {
            spot: state_values[j],
            lower,
            upper,
            values: Vec::with_capacity(self.average_points),
        }
    }

    fn roll_back_node(
        &self,
        discount_factor: f64,
        [down, middle, up]: [f64; 3],
        state_values: &[f64],
        successors: &[AsianNode],
        layer: usize,
        j: usize,
    ) -> AsianNode {
        let mut node = self.grid_node(state_values, layer, j);
        let observed = (layer + 1) as f64;
        for k in 0..self.average_points {
            let average = average_at(node.lower, node.upper, self.average_points, k);
            let next =
                |s: &AsianNode| s.value_at((average * observed + s.spot) / (observed + 1.0));
            node.values.push(
                discount_factor
                    * (up * next(&successors[2])
                        + middle * next(&successors[1])
                        + down * next(&successors[0])),
            );
        }
        node
    }
}

impl ContractTerms for AsianArithmeticOption {
    #[inline]
    fn strike(&self) -> f64 {
        self.params.strike()
    }

    #[inline]
    fn time_to_expiry(&self) -> f64 {
        self.params.time_to_expiry()
    }
}

impl LatticeFunction for AsianArithmeticOption {
    type Node = AsianNode;

    fn expiry_nodes(&self, state_values: &[f64], number_of_steps: usize) -> Vec<AsianNode> {
        assert_layer_shape("state values", state_values.len(), number_of_steps);
        let strike = self.params.strike();
        (0..state_values.len())
            .map(|j| {
                let mut node = self.grid_node(state_values, number_of_steps, j);
                for k in 0..self.average_points {
                    let average = average_at(node.lower, node.upper, self.average_points, k);
                    node.values.push(self.put_call.intrinsic(average, strike));
                }
                node
            })
            .collect()
    }

    fn roll_back(
        &self,
        discount_factor: f64,
        transition_probability: &TransitionMatrix,
        state_values: &[f64],
        nodes: &[AsianNode],
        layer: usize,
    ) -> Vec<AsianNode> {
        assert_layer_shape("state values", state_values.len(), layer);
        assert_layer_shape("option values", nodes.len(), layer + 1);
        assert_layer_shape(
            "transition probabilities",
            transition_probability.rows(),
            layer,
        );

        let node = |j: usize| {
            self.roll_back_node(
                discount_factor,
                transition_probability.row(j),
                state_values,
                &nodes[j..j + 3],
                layer,
                j,
            )
        };

        let n_nodes = node_count(layer);
        if n_nodes * self.average_points >= PARALLEL_MIN_NODES {
            (0..n_nodes).into_par_iter().map(node).collect()
        } else {
            (0..n_nodes).map(node).collect()
        }
    }

    /// At the root the only observation is the root spot itself.
    fn node_value(&self, node: &AsianNode) -> f64 {
        node.value_at(node.spot)
    }
}
