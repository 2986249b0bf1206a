//! Knock-out barrier option function.
//!
//! The barrier is monitored at every node of the tree. A node whose state
//! value has breached the barrier is worth the rebate, paid at the node; all
//! other nodes take the vanilla payoff at expiry and the discounted
//! expectation before it.

use pricer_core::math::{assert_layer_shape, discounted_expectation, TransitionMatrix};
use pricer_core::traits::{ContractTerms, OptionFunction};

use super::error::InstrumentError;
use super::params::OptionParams;
use super::payoff::PutCall;

/// Knock-out barrier direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BarrierType {
    /// Knocked out once the state reaches the barrier from below
    UpAndOut,
    /// Knocked out once the state reaches the barrier from above
    DownAndOut,
}

impl BarrierType {
    /// Returns true if this is an "up" barrier.
    #[inline]
    pub fn is_up(&self) -> bool {
        matches!(self, BarrierType::UpAndOut)
    }

    /// Returns whether `state` has breached `barrier`.
    ///
    /// Touching the barrier counts as a breach.
    #[inline]
    pub fn is_breached(&self, state: f64, barrier: f64) -> bool {
        match self {
            BarrierType::UpAndOut => state >= barrier,
            BarrierType::DownAndOut => state <= barrier,
        }
    }
}

/// Single constant barrier knock-out option with rebate.
///
/// # Examples
/// ```
/// use pricer_core::traits::OptionFunction;
/// use pricer_models::instruments::{
///     BarrierKnockOutOption, BarrierType, OptionParams, PutCall,
/// };
///
/// let params = OptionParams::new(100.0, 1.0).unwrap();
/// let option =
///     BarrierKnockOutOption::new(params, PutCall::Call, 120.0, BarrierType::UpAndOut, 1.0)
///         .unwrap();
/// assert_eq!(option.payoff_at_expiry(&[80.0, 110.0, 130.0], 1), vec![0.0, 10.0, 1.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierKnockOutOption {
    params: OptionParams,
    put_call: PutCall,
    barrier: f64,
    barrier_type: BarrierType,
    rebate: f64,
}

impl BarrierKnockOutOption {
    /// Creates a knock-out option.
    ///
    /// # Errors
    /// - `InvalidBarrier` if `barrier` is not a positive finite number
    /// - `InvalidRebate` if `rebate` is negative or not finite
    pub fn new(
        params: OptionParams,
        put_call: PutCall,
        barrier: f64,
        barrier_type: BarrierType,
        rebate: f64,
    ) -> Result<Self, InstrumentError> {
        if !(barrier > 0.0 && barrier.is_finite()) {
            return Err(InstrumentError::InvalidBarrier { barrier });
        }
        if !(rebate >= 0.0 && rebate.is_finite()) {
            return Err(InstrumentError::InvalidRebate { rebate });
        }
        Ok(Self {
            params,
            put_call,
            barrier,
            barrier_type,
            rebate,
        })
    }

    /// Returns the barrier level.
    #[inline]
    pub fn barrier(&self) -> f64 {
        self.barrier
    }

    /// Returns the barrier direction.
    #[inline]
    pub fn barrier_type(&self) -> BarrierType {
        self.barrier_type
    }

    /// Returns the rebate paid on knock-out.
    #[inline]
    pub fn rebate(&self) -> f64 {
        self.rebate
    }

    #[inline]
    fn is_knocked_out(&self, state: f64) -> bool {
        self.barrier_type.is_breached(state, self.barrier)
    }
}

impl ContractTerms for BarrierKnockOutOption {
    #[inline]
    fn strike(&self) -> f64 {
        self.params.strike()
    }

    #[inline]
    fn time_to_expiry(&self) -> f64 {
        self.params.time_to_expiry()
    }
}

impl OptionFunction for BarrierKnockOutOption {
    fn payoff_at_expiry(&self, state_values: &[f64], number_of_steps: usize) -> Vec<f64> {
        assert_layer_shape("state values", state_values.len(), number_of_steps);
        let strike = self.params.strike();
        state_values
            .iter()
            .map(|&spot| {
                if self.is_knocked_out(spot) {
                    self.rebate
                } else {
                    self.put_call.intrinsic(spot, strike)
                }
            })
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
        let mut continuation =
            discounted_expectation(discount_factor, transition_probability, values, layer);
        for (value, &spot) in continuation.iter_mut().zip(state_values) {
            if self.is_knocked_out(spot) {
                *value = self.rebate;
            }
        }
        continuation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_core::math::UniformProbabilities;

    fn params() -> OptionParams {
        OptionParams::new(100.0, 1.0).unwrap()
    }

    #[test]
    fn test_breach_includes_touch() {
        assert!(BarrierType::UpAndOut.is_breached(120.0, 120.0));
        assert!(!BarrierType::UpAndOut.is_breached(119.9, 120.0));
        assert!(BarrierType::DownAndOut.is_breached(80.0, 80.0));
        assert!(!BarrierType::DownAndOut.is_breached(80.1, 80.0));
        assert!(BarrierType::UpAndOut.is_up());
        assert!(!BarrierType::DownAndOut.is_up());
    }

    #[test]
    fn test_down_and_out_put_payoff() {
        let option =
            BarrierKnockOutOption::new(params(), PutCall::Put, 85.0, BarrierType::DownAndOut, 0.0)
                .unwrap();
        assert_eq!(
            option.payoff_at_expiry(&[80.0, 90.0, 110.0], 1),
            vec![0.0, 10.0, 0.0]
        );
    }

    #[test]
    fn test_knocked_out_nodes_take_rebate() {
        let option =
            BarrierKnockOutOption::new(params(), PutCall::Call, 120.0, BarrierType::UpAndOut, 2.5)
                .unwrap();
        let probs = TransitionMatrix::uniform(3, UniformProbabilities::new(0.25, 0.5, 0.25));
        let out = option.next_layer_values(
            1.0,
            &probs,
            &[90.0, 100.0, 125.0],
            &[0.0, 0.0, 4.0, 8.0, 2.5],
            1,
        );
        assert_eq!(out[0], 0.25 * 4.0);
        assert_eq!(out[1], 0.25 * 8.0 + 0.5 * 4.0);
        assert_eq!(out[2], 2.5);
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            BarrierKnockOutOption::new(params(), PutCall::Call, 0.0, BarrierType::UpAndOut, 0.0),
            Err(InstrumentError::InvalidBarrier { .. })
        ));
        assert!(matches!(
            BarrierKnockOutOption::new(params(), PutCall::Call, 120.0, BarrierType::UpAndOut, -1.0),
            Err(InstrumentError::InvalidRebate { .. })
        ));
    }
}
