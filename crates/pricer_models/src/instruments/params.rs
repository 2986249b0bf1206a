//! Common contract parameters.

use super::error::InstrumentError;

/// Strike and time to expiry shared by every option function.
///
/// Both values must be positive and finite.
///
/// # Examples
/// ```
/// use pricer_models::instruments::OptionParams;
///
/// let params = OptionParams::new(100.0, 1.0).unwrap();
/// assert_eq!(params.strike(), 100.0);
/// assert_eq!(params.time_to_expiry(), 1.0);
///
/// assert!(OptionParams::new(-100.0, 1.0).is_err());
/// assert!(OptionParams::new(100.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionParams {
    strike: f64,
    time_to_expiry: f64,
}

impl OptionParams {
    /// Creates validated contract parameters.
    ///
    /// # Errors
    /// - `InvalidStrike` if `strike` is not a positive finite number
    /// - `InvalidExpiry` if `time_to_expiry` is not a positive finite number
    pub fn new(strike: f64, time_to_expiry: f64) -> Result<Self, InstrumentError> {
        if !(strike > 0.0 && strike.is_finite()) {
            return Err(InstrumentError::InvalidStrike { strike });
        }
        if !(time_to_expiry > 0.0 && time_to_expiry.is_finite()) {
            return Err(InstrumentError::InvalidExpiry {
                expiry: time_to_expiry,
            });
        }
        Ok(Self {
            strike,
            time_to_expiry,
        })
    }

    /// Returns the strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Returns the time to expiry in years.
    #[inline]
    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }
}
