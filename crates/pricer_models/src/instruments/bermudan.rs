//! Bermudan option function.

use std::collections::BTreeSet;

use pricer_core::math::{assert_layer_shape, discounted_expectation, TransitionMatrix};
use pricer_core::traits::{ContractTerms, OptionFunction};

use super::error::InstrumentError;
use super::params::OptionParams;
use super::payoff::PutCall;

/// Bermudan call or put: exercisable on a set of tree layers.
///
/// On exercise layers the node value is floored at the intrinsic value, as
/// for an American option; elsewhere the default continuation applies.
/// Exercise at expiry is always allowed through the terminal payoff.
///
/// # Examples
/// ```
/// use pricer_models::instruments::{BermudanOption, OptionParams, PutCall};
///
/// let params = OptionParams::new(100.0, 1.0).unwrap();
/// // Quarterly exercise on a 100-step tree
/// let option =
///     BermudanOption::from_exercise_times(params, PutCall::Put, &[0.25, 0.5, 0.75], 100).unwrap();
/// assert!(option.is_exercise_layer(50));
/// assert!(!option.is_exercise_layer(49));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BermudanOption {
    params: OptionParams,
    put_call: PutCall,
    exercise_layers: BTreeSet<usize>,
}

impl BermudanOption {
    /// Creates a Bermudan option exercisable on the given layer indices.
    pub fn new(
        params: OptionParams,
        put_call: PutCall,
        exercise_layers: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            params,
            put_call,
            exercise_layers: exercise_layers.into_iter().collect(),
        }
    }

    /// Creates a Bermudan option from exercise times in years.
    ///
    /// Each time is mapped to the nearest layer of a `number_of_steps` tree
    /// spanning the contract's time to expiry.
    ///
    /// # Errors
    /// `InvalidParameter` if a time is negative, not finite or beyond expiry.
    pub fn from_exercise_times(
        params: OptionParams,
        put_call: PutCall,
        exercise_times: &[f64],
        number_of_steps: usize,
    ) -> Result<Self, InstrumentError> {
        let expiry = params.time_to_expiry();
        let mut layers = BTreeSet::new();
        for &t in exercise_times {
            if !(0.0..=expiry).contains(&t) {
                return Err(InstrumentError::InvalidParameter {
                    message: format!("exercise time {} outside [0, {}]", t, expiry),
                });
            }
            let layer = ((t / expiry) * number_of_steps as f64).round() as usize;
            layers.insert(layer.min(number_of_steps));
        }
        Ok(Self {
            params,
            put_call,
            exercise_layers: layers,
        })
    }

    /// Returns whether early exercise is allowed on `layer`.
    #[inline]
    pub fn is_exercise_layer(&self, layer: usize) -> bool {
        self.exercise_layers.contains(&layer)
    }

    /// Exercise layers in increasing order.
    pub fn exercise_layers(&self) -> impl Iterator<Item = usize> + '_ {
        self.exercise_layers.iter().copied()
    }
}

impl ContractTerms for BermudanOption {
    #[inline]
    fn strike(&self) -> f64 {
        self.params.strike()
    }

    #[inline]
    fn time_to_expiry(&self) -> f64 {
        self.params.time_to_expiry()
    }
}

impl OptionFunction for BermudanOption {
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
        let mut continuation =
            discounted_expectation(discount_factor, transition_probability, values, layer);
        if self.is_exercise_layer(layer) {
            assert_layer_shape("state values", state_values.len(), layer);
            let strike = self.params.strike();
            for (value, &spot) in continuation.iter_mut().zip(state_values) {
                *value = value.max(self.put_call.intrinsic(spot, strike));
            }
        }
        continuation
    }
}
