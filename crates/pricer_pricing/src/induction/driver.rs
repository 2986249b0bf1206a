//! Backward-induction state machine.

use std::borrow::Cow;

use pricer_core::math::{node_count, TransitionMatrix};
use pricer_core::traits::LatticeFunction;
use pricer_core::types::LatticeError;
use tracing::{debug, trace, warn};

use crate::tree::TreeProvider;

/// Walk from the terminal layer `n` back to the root.
///
/// The machine starts in `Layer(n)` holding the expiry nodes and each
/// [`step`](Self::step) moves it from `Layer(i+1)` to `Layer(i)`. Layers
/// are strictly sequential; parallelism, if any, happens inside a layer in
/// the contract's roll-back.
///
/// Provider data is shape-checked as it is read, so a malformed custom
/// [`TreeProvider`] surfaces as a [`LatticeError::LayerShape`] instead of a
/// panic deep inside a contract.
///
/// # Examples
/// ```
/// use pricer_core::math::UniformProbabilities;
/// use pricer_models::instruments::{EuropeanOption, OptionParams, PutCall};
/// use pricer_pricing::induction::BackwardInduction;
/// use pricer_pricing::tree::UniformTrinomialTree;
///
/// let option = EuropeanOption::new(OptionParams::new(100.0, 1.0).unwrap(), PutCall::Call);
/// let tree = UniformTrinomialTree::new(
///     100.0, 0.95, 1.0, 10, UniformProbabilities::new(0.25, 0.5, 0.25), 0.999,
/// )
/// .unwrap();
///
/// let mut induction = BackwardInduction::new(&option, &tree).unwrap();
/// assert_eq!(induction.layer(), 10);
/// while induction.step().unwrap() {}
/// assert!(induction.is_complete());
/// assert!(induction.root_value().unwrap() > 0.0);
/// ```
pub struct BackwardInduction<'a, F: LatticeFunction, P: TreeProvider> {
    function: &'a F,
    tree: &'a P,
    layer: usize,
    nodes: Vec<F::Node>,
}

impl<'a, F: LatticeFunction, P: TreeProvider> BackwardInduction<'a, F, P> {
    /// Evaluates the expiry layer and returns the machine in `Layer(n)`.
    ///
    /// # Errors
    /// `LayerShape` if the provider's terminal state values have the wrong
    /// length.
    pub fn new(function: &'a F, tree: &'a P) -> Result<Self, LatticeError> {
        let steps = tree.number_of_steps();
        let state_values = checked_states(tree, steps)?;
        debug!(
            steps,
            strike = function.strike(),
            time_to_expiry = function.time_to_expiry(),
            "starting backward induction"
        );
        let nodes = function.expiry_nodes(&state_values, steps);
        Ok(Self {
            function,
            tree,
            layer: steps,
            nodes,
        })
    }

    /// The contract being valued.
    #[inline]
    pub fn function(&self) -> &'a F {
        self.function
    }

    /// Current layer index.
    #[inline]
    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Nodes of the current layer.
    #[inline]
    pub fn nodes(&self) -> &[F::Node] {
        &self.nodes
    }

    /// Returns whether the machine has reached the root.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.layer == 0
    }

    /// Value at the root, once [`is_complete`](Self::is_complete).
    pub fn root_value(&self) -> Option<f64> {
        if self.is_complete() {
            self.nodes.first().map(|node| self.function.node_value(node))
        } else {
            None
        }
    }

    /// Rolls back one layer.
    ///
    /// Returns `Ok(false)` without doing anything once the root is reached.
    ///
    /// # Errors
    /// `LayerShape` if the provider's data for the next layer is malformed.
    pub fn step(&mut self) -> Result<bool, LatticeError> {
        if self.is_complete() {
            return Ok(false);
        }
        let layer = self.layer - 1;
        let discount_factor = self.tree.discount_factor(layer);
        let transition_probability = checked_matrix(self.tree, layer)?;
        let state_values = checked_states(self.tree, layer)?;

        self.nodes = self.function.roll_back(
            discount_factor,
            &transition_probability,
            &state_values,
            &self.nodes,
            layer,
        );
        self.layer = layer;
        trace!(layer, discount_factor, "rolled back");
        Ok(true)
    }

    /// Runs to the root and returns its value.
    ///
    /// A non-finite result is logged and returned unchanged.
    pub fn run(mut self) -> Result<f64, LatticeError> {
        while self.step()? {}
        Ok(self.finish())
    }

    /// Consumes the machine, returning the current layer's nodes.
    pub fn into_nodes(self) -> Vec<F::Node> {
        self.nodes
    }

    /// Root value with completion logging; NaN if the walk is unfinished.
    pub(crate) fn finish(&self) -> f64 {
        let value = self.root_value().unwrap_or(f64::NAN);
        if value.is_finite() {
            debug!(value, "backward induction complete");
        } else {
            warn!(
                value,
                layer = self.layer,
                "backward induction produced a non-finite root value"
            );
        }
        value
    }
}

fn checked_states<P: TreeProvider>(
    tree: &P,
    layer: usize,
) -> Result<Cow<'_, [f64]>, LatticeError> {
    let states = tree.state_values(layer);
    check_len("state values", layer, states.len())?;
    Ok(states)
}

fn checked_matrix<P: TreeProvider>(
    tree: &P,
    layer: usize,
) -> Result<Cow<'_, TransitionMatrix>, LatticeError> {
    let matrix = tree.transition_probability(layer);
    check_len("transition probabilities", layer, matrix.rows())?;
    Ok(matrix)
}

fn check_len(what: &'static str, layer: usize, actual: usize) -> Result<(), LatticeError> {
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

/// Price of `function` on `tree`: the root value after a full walk.
///
/// For `n = 0` this is the payoff at the single node, with no roll-back.
///
/// # Examples
/// ```
/// use pricer_core::math::TransitionMatrix;
/// use pricer_models::instruments::{EuropeanOption, OptionParams, PutCall};
/// use pricer_pricing::induction::price;
/// use pricer_pricing::tree::TrinomialTreeData;
///
/// let option = EuropeanOption::new(OptionParams::new(100.0, 1.0).unwrap(), PutCall::Call);
/// let tree = TrinomialTreeData::new(
///     vec![vec![100.0], vec![80.0, 100.0, 130.0]],
///     vec![TransitionMatrix::from_rows(&[[0.25, 0.5, 0.25]])],
///     vec![0.99],
/// )
/// .unwrap();
/// assert!((price(&option, &tree).unwrap() - 0.99 * 0.25 * 30.0).abs() < 1e-12);
/// ```
pub fn price<F, P>(function: &F, tree: &P) -> Result<f64, LatticeError>
where
    F: LatticeFunction,
    P: TreeProvider,
{
    BackwardInduction::new(function, tree)?.run()
}

/// Every layer of a completed walk; index `i` holds layer `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeLayers<N> {
    layers: Vec<Vec<N>>,
}

impl<N> LatticeLayers<N> {
    /// Number of steps `n` (the terminal layer index).
    #[inline]
    pub fn number_of_steps(&self) -> usize {
        self.layers.len() - 1
    }

    /// Nodes of layer `layer`.
    ///
    /// # Panics
    /// Panics if `layer > n`.
    #[inline]
    pub fn layer(&self, layer: usize) -> &[N] {
        &self.layers[layer]
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> &N {
        &self.layers[0][0]
    }

    /// Iterates from the root to the terminal layer.
    pub fn iter(&self) -> impl Iterator<Item = &[N]> + '_ {
        self.layers.iter().map(Vec::as_slice)
    }

    /// Consumes the layers, root first.
    pub fn into_inner(self) -> Vec<Vec<N>> {
        self.layers
    }
}

impl LatticeLayers<f64> {
    /// Root value of a scalar lattice.
    #[inline]
    pub fn price(&self) -> f64 {
        *self.root()
    }
}

/// Walks `function` over `tree` keeping every layer, for sensitivity
/// analysis.
///
/// Memory grows as `O(n^2)` nodes.
pub fn all_layer_values<F, P>(
    function: &F,
    tree: &P,
) -> Result<LatticeLayers<F::Node>, LatticeError>
where
    F: LatticeFunction,
    P: TreeProvider,
{
    let mut induction = BackwardInduction::new(function, tree)?;
    let mut layers = Vec::with_capacity(induction.layer() + 1);
    layers.push(induction.nodes().to_vec());
    while induction.step()? {
        layers.push(induction.nodes().to_vec());
    }
    induction.finish();
    layers.reverse();
    Ok(LatticeLayers { layers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{TrinomialTreeData, UniformTrinomialTree};
    use approx::assert_relative_eq;
    use pricer_core::math::UniformProbabilities;
    use pricer_core::traits::{ContractTerms, OptionFunction};

    /// Pays a fixed terminal vector, regardless of the state.
    struct Fixed(Vec<f64>);

    impl ContractTerms for Fixed {
        fn strike(&self) -> f64 {
            1.0
        }
        fn time_to_expiry(&self) -> f64 {
            1.0
        }
    }

    impl OptionFunction for Fixed {
        fn payoff_at_expiry(&self, _state_values: &[f64], _number_of_steps: usize) -> Vec<f64> {
            self.0.clone()
        }
    }

    /// Lends whatever it holds, without validation.
    struct Raw {
        states: Vec<Vec<f64>>,
        rows: Vec<TransitionMatrix>,
    }

    impl TreeProvider for Raw {
        fn number_of_steps(&self) -> usize {
            self.states.len() - 1
        }
        fn spot(&self) -> f64 {
            self.states[0][0]
        }
        fn state_values(&self, layer: usize) -> Cow<'_, [f64]> {
            Cow::Borrowed(&self.states[layer])
        }
        fn transition_probability(&self, layer: usize) -> Cow<'_, TransitionMatrix> {
            Cow::Borrowed(&self.rows[layer])
        }
        fn discount_factor(&self, _layer: usize) -> f64 {
            1.0
        }
    }

    fn one_step_tree() -> TrinomialTreeData {
        TrinomialTreeData::new(
            vec![vec![10.0], vec![9.0, 10.0, 12.0]],
            vec![TransitionMatrix::from_rows(&[[0.25, 0.5, 0.25]])],
            vec![0.99],
        )
        .unwrap()
    }

    #[test]
    fn test_one_step_price() {
        let value = price(&Fixed(vec![9.0, 10.0, 12.0]), &one_step_tree()).unwrap();
        assert_relative_eq!(value, 10.1475, epsilon = 1e-12);
    }

    #[test]
    fn test_state_machine_transitions() {
        let function = Fixed(vec![9.0, 10.0, 12.0]);
        let tree = one_step_tree();
        let mut induction = BackwardInduction::new(&function, &tree).unwrap();
        assert_eq!(induction.layer(), 1);
        assert!(!induction.is_complete());
        assert_eq!(induction.root_value(), None);
        assert_eq!(induction.nodes(), &[9.0, 10.0, 12.0]);

        assert!(induction.step().unwrap());
        assert!(induction.is_complete());
        assert!(!induction.step().unwrap());
        assert_eq!(induction.into_nodes().len(), 1);
    }

    #[test]
    fn test_zero_steps_returns_payoff() {
        let tree = TrinomialTreeData::new(vec![vec![10.0]], vec![], vec![]).unwrap();
        let function = Fixed(vec![7.5]);
        assert_eq!(price(&function, &tree).unwrap(), 7.5);

        let layers = all_layer_values(&function, &tree).unwrap();
        assert_eq!(layers.number_of_steps(), 0);
        assert_eq!(layers.price(), 7.5);
    }

    #[test]
    fn test_all_layer_values_are_root_first() {
        let tree = UniformTrinomialTree::new(
            100.0,
            0.9,
            1.0,
            4,
            UniformProbabilities::new(0.2, 0.6, 0.2),
            0.99,
        )
        .unwrap();
        let function = Fixed((0..9).map(|k| k as f64).collect());
        let layers = all_layer_values(&function, &tree).unwrap();

        assert_eq!(layers.number_of_steps(), 4);
        for (i, layer) in layers.iter().enumerate() {
            assert_eq!(layer.len(), node_count(i));
        }
        assert_eq!(layers.layer(4), function.0.as_slice());
        assert_eq!(layers.price(), price(&function, &tree).unwrap());
        assert_eq!(layers.into_inner().len(), 5);
    }

    #[test]
    fn test_malformed_provider_is_an_error() {
        let tree = Raw {
            states: vec![vec![10.0], vec![9.0, 12.0]],
            rows: vec![TransitionMatrix::from_rows(&[[0.25, 0.5, 0.25]])],
        };
        let result = price(&Fixed(vec![1.0, 2.0]), &tree);
        assert_eq!(
            result,
            Err(LatticeError::LayerShape {
                what: "state values",
                layer: 1,
                expected: 3,
                actual: 2
            })
        );

        let tree = Raw {
            states: vec![vec![10.0], vec![9.0, 10.0, 12.0]],
            rows: vec![TransitionMatrix::from_rows(&[])],
        };
        let result = price(&Fixed(vec![1.0, 2.0, 3.0]), &tree);
        assert!(matches!(
            result,
            Err(LatticeError::LayerShape {
                what: "transition probabilities",
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_root_is_returned() {
        let value = price(&Fixed(vec![f64::NAN, 1.0, 1.0]), &one_step_tree()).unwrap();
        assert!(value.is_nan());
    }
}
