//! Instrument error types.
//!
//! This module provides structured error handling for option-function
//! construction.

use pricer_core::types::LatticeError;
use thiserror::Error;

/// Instrument-related errors.
///
/// # Variants
/// - `InvalidStrike`: Strike is non-positive or not finite
/// - `InvalidExpiry`: Time to expiry is non-positive or not finite
/// - `InvalidBarrier`: Barrier level is non-positive or not finite
/// - `InvalidRebate`: Rebate is negative or not finite
/// - `InvalidParameter`: General parameter validation failure
///
/// # Examples
/// ```
/// use pricer_models::instruments::InstrumentError;
///
/// let err = InstrumentError::InvalidStrike { strike: -100.0 };
/// assert!(format!("{}", err).contains("-100"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Invalid strike price.
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Invalid time to expiry.
    #[error("Invalid expiry: T = {expiry}")]
    InvalidExpiry {
        /// The invalid expiry value
        expiry: f64,
    },

    /// Invalid barrier level.
    #[error("Invalid barrier: B = {barrier}")]
    InvalidBarrier {
        /// The invalid barrier value
        barrier: f64,
    },

    /// Invalid rebate.
    #[error("Invalid rebate: R = {rebate}")]
    InvalidRebate {
        /// The invalid rebate value
        rebate: f64,
    },

    /// Invalid parameter (general validation failure).
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the parameter error
        message: String,
    },
}

impl From<InstrumentError> for LatticeError {
    fn from(err: InstrumentError) -> Self {
        match err {
            InstrumentError::InvalidStrike { strike } => LatticeError::InvalidContract {
                name: "strike",
                value: strike,
            },
            InstrumentError::InvalidExpiry { expiry } => LatticeError::InvalidContract {
                name: "time_to_expiry",
                value: expiry,
            },
            InstrumentError::InvalidBarrier { barrier } => LatticeError::InvalidContract {
                name: "barrier",
                value: barrier,
            },
            InstrumentError::InvalidRebate { rebate } => LatticeError::InvalidContract {
                name: "rebate",
                value: rebate,
            },
            InstrumentError::InvalidParameter { message } => LatticeError::InvalidParameter {
                name: "instrument",
                message,
            },
        }
    }
}
