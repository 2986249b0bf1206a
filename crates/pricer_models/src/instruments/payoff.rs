//! Put/call payoff definitions.

/// Direction of a vanilla payoff.
///
/// # Examples
/// ```
/// use pricer_models::instruments::PutCall;
///
/// assert_eq!(PutCall::Call.intrinsic(110.0, 100.0), 10.0);
/// assert_eq!(PutCall::Put.intrinsic(110.0, 100.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PutCall {
    /// max(S - K, 0)
    Call,
    /// max(K - S, 0)
    Put,
}

impl PutCall {
    /// Intrinsic value at spot `spot` for strike `strike`.
    #[inline]
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            PutCall::Call => (spot - strike).max(0.0),
            PutCall::Put => (strike - spot).max(0.0),
        }
    }

    /// Returns whether this is a call.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, PutCall::Call)
    }

    /// Returns whether this is a put.
    #[inline]
    pub fn is_put(&self) -> bool {
        matches!(self, PutCall::Put)
    }
}
