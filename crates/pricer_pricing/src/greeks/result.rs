//! Lattice Greeks result type.

/// Price and tree-implied sensitivities.
///
/// # First-Order Greeks
///
/// - `delta`: ∂V/∂S from the two outer nodes of layer 1
/// - `theta`: ∂V/∂t from the middle node of layer 2 against the root
///
/// # Second-Order Greeks
///
/// - `gamma`: ∂²V/∂S² from the three-point stencil on layer 2
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::greeks::LatticeGreeks;
///
/// let greeks = LatticeGreeks {
///     price: 10.5,
///     delta: 0.55,
///     gamma: 0.02,
///     theta: -4.1,
/// };
/// assert_eq!(greeks.as_row(), [10.5, 0.55, 0.02, -4.1]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeGreeks {
    /// Present value at the root.
    pub price: f64,
    /// Delta: ∂V/∂S (sensitivity to spot price).
    pub delta: f64,
    /// Gamma: ∂²V/∂S² (convexity with respect to spot).
    pub gamma: f64,
    /// Theta: ∂V/∂t per year (time decay).
    pub theta: f64,
}

impl LatticeGreeks {
    /// Values in the order price, delta, gamma, theta.
    #[inline]
    pub fn as_row(&self) -> [f64; 4] {
        [self.price, self.delta, self.gamma, self.theta]
    }

    /// Returns whether every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.as_row().iter().all(|v| v.is_finite())
    }
}
