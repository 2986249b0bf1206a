//! American option function.

use pricer_core::math::{assert_layer_shape, discounted_expectation, TransitionMatrix};
use pricer_core::traits::{ContractTerms, OptionFunction};

use super::params::OptionParams;
use super::payoff::PutCall;

/// American call or put: exercisable at every node.
///
/// Each node takes the larger of the discounted continuation value and the
/// immediate-exercise value at the node's state.
///
/// # Examples
/// ```
/// use pricer_core::math::{TransitionMatrix, UniformProbabilities};
/// use pricer_core::traits::OptionFunction;
/// use pricer_models::instruments::{AmericanOption, OptionParams, PutCall};
///
/// let put = AmericanOption::new(OptionParams::new(100.0, 1.0).unwrap(), PutCall::Put);
/// let probs = TransitionMatrix::uniform(1, UniformProbabilities::new(0.25, 0.5, 0.25));
///
/// // Continuation is worth less than exercising immediately at a spot of 70
/// let root = put.next_layer_values(0.99, &probs, &[70.0], &[25.0, 30.0, 35.0], 0);
/// assert_eq!(root, vec![30.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmericanOption {
    params: OptionParams,
    put_call: PutCall,
}

impl AmericanOption {
    /// Creates an American option.
    #[inline]
    pub fn new(params: OptionParams, put_call: PutCall) -> Self {
        Self { params, put_call }
    }

    /// Returns the payoff direction.
    #[inline]
    pub fn put_call(&self) -> PutCall {
        self.put_call
    }
}

impl ContractTerms for AmericanOption {
    #[inline]
    fn strike(&self) -> f64 {
        self.params.strike()
    }

    #[inline]
    fn time_to_expiry(&self) -> f64 {
        self.params.time_to_expiry()
    }
}

impl OptionFunction for AmericanOption {
    fn payoff_at_expiry(&self, state_values: &[f64], number_of_steps: usize) -> Vec<f64> {
        assert_layer_shape("state values", state_values.len(), number_of_steps);
        let strike = self.params.strike();
        state_values
            .iter()
            .map(|&spot| self.put_call.intrinsic(spot, strike))
            .collect()
    }

    fn next_layer_values(
        &self,
        discount_factor: f64,
        transition_probability: &TransitionMatrix,
        state_values: &[f64],
        values: &[f64],
        layer: usize,
    ) -> Vec<f64> {
        assert_layer_shape("state values", state_values.len(), layer);
        let strike = self.params.strike();
        let mut continuation =
            discounted_expectation(discount_factor, transition_probability, values, layer);
        for (value, &spot) in continuation.iter_mut().zip(state_values) {
            *value = value.max(self.put_call.intrinsic(spot, strike));
        }
        continuation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::EuropeanOption;
    use pricer_core::math::{geometric_state_values, node_count, UniformProbabilities};
    use proptest::prelude::*;

    fn params() -> OptionParams {
        OptionParams::new(100.0, 1.0).unwrap()
    }

    #[test]
    fn test_early_exercise_binds() {
        let put = AmericanOption::new(params(), PutCall::Put);
        let probs = TransitionMatrix::uniform(3, UniformProbabilities::new(0.25, 0.5, 0.25));
        let states = [60.0, 100.0, 140.0];
        let values = [45.0, 40.0, 0.0, 0.0, 0.0];
        let out = put.next_layer_values(0.9, &probs, &states, &values, 1);
        // node 0: continuation 0.9 * (0.25*45 + 0.5*40 + 0.25*0) = 28.125 < 40
        assert_eq!(out[0], 40.0);
        // node 1: continuation 0.9 * 0.25 * 40 = 9 > 0
        assert!((out[1] - 9.0).abs() < 1e-12);
        assert_eq!(out[2], 0.0);
    }

    #[test]
    fn test_payoff_matches_intrinsic() {
        let call = AmericanOption::new(params(), PutCall::Call);
        assert_eq!(
            call.payoff_at_expiry(&[80.0, 100.0, 130.0], 1),
            vec![0.0, 0.0, 30.0]
        );
    }

    #[test]
    #[should_panic(expected = "state values for layer 1")]
    fn test_rejects_short_state_values() {
        let put = AmericanOption::new(params(), PutCall::Put);
        let probs = TransitionMatrix::uniform(3, UniformProbabilities::middle_only());
        let _ = put.next_layer_values(1.0, &probs, &[100.0], &[0.0; 5], 1);
    }

    proptest! {
        #[test]
        fn prop_american_dominates_european(
            layer in 0usize..40,
            down in 0.85f64..0.99,
            p_down in 0.05f64..0.45,
            p_up in 0.05f64..0.45,
            df in 0.9f64..1.0,
            is_put in any::<bool>(),
            seed in 0.0f64..10.0,
        ) {
            let put_call = if is_put { PutCall::Put } else { PutCall::Call };
            let american = AmericanOption::new(params(), put_call);
            let european = EuropeanOption::new(params(), put_call);

            let probs = TransitionMatrix::uniform(
                node_count(layer),
                UniformProbabilities::new(p_down, 1.0 - p_down - p_up, p_up),
            );
            let states = geometric_state_values(100.0, down, 1.0, layer);
            let values: Vec<f64> = (0..node_count(layer + 1))
                .map(|k| ((k as f64 + seed).sin() + 1.0) * 10.0)
                .collect();

            let a = american.next_layer_values(df, &probs, &states, &values, layer);
            let e = european.next_layer_values(df, &probs, &states, &values, layer);
            prop_assert_eq!(a.len(), 2 * layer + 1);
            for (av, ev) in a.iter().zip(&e) {
                prop_assert!(av >= ev);
            }
        }
    }
}
