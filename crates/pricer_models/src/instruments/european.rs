//! European vanilla option function.

use pricer_core::math::assert_layer_shape;
use pricer_core::traits::{ContractTerms, OptionFunction};

use super::params::OptionParams;
use super::payoff::PutCall;

/// European call or put: exercise at expiry only.
///
/// Uses the default continuation step (discounted expectation).
///
/// # Examples
/// ```
/// use pricer_core::traits::OptionFunction;
/// use pricer_models::instruments::{EuropeanOption, OptionParams, PutCall};
///
/// let params = OptionParams::new(100.0, 1.0).unwrap();
/// let call = EuropeanOption::new(params, PutCall::Call);
/// assert_eq!(call.payoff_at_expiry(&[80.0, 100.0, 130.0], 1), vec![0.0, 0.0, 30.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EuropeanOption {
    params: OptionParams,
    put_call: PutCall,
}

impl EuropeanOption {
    /// Creates a European option.
    #[inline]
    pub fn new(params: OptionParams, put_call: PutCall) -> Self {
        Self { params, put_call }
    }

    /// Returns the payoff direction.
    #[inline]
    pub fn put_call(&self) -> PutCall {
        self.put_call
    }

    /// Returns the contract parameters.
    #[inline]
    pub fn params(&self) -> &OptionParams {
        &self.params
    }
}

impl ContractTerms for EuropeanOption {
    #[inline]
    fn strike(&self) -> f64 {
        self.params.strike()
    }

    #[inline]
    fn time_to_expiry(&self) -> f64 {
        self.params.time_to_expiry()
    }
}

impl OptionFunction for EuropeanOption {
    fn payoff_at_expiry(&self, state_values: &[f64], number_of_steps: usize) -> Vec<f64> {
        assert_layer_shape("state values", state_values.len(), number_of_steps);
        let strike = self.params.strike();
        state_values
            .iter()
            .map(|&spot| self.put_call.intrinsic(spot, strike))
            .collect()
    }
}
