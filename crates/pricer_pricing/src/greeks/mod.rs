//! Greeks read off the first layers of the lattice.
//!
//! One walk gives the price and, from the nodes of layers 1 and 2, finite
//! differences in spot and time without re-pricing:
//!
//! ```text
//! delta = (V1[2] - V1[0]) / (S1[2] - S1[0])
//! gamma = 2 (D_up - D_down) / (S2[4] - S2[0])
//!     D_up   = (V2[4] - V2[2]) / (S2[4] - S2[2])
//!     D_down = (V2[2] - V2[0]) / (S2[2] - S2[0])
//! theta = (V2[2] - V0) / (2 dt),   dt = T / n
//! ```
//!
//! Theta assumes the middle node of layer 2 sits at (or near) the spot, as
//! on a symmetric tree.

mod result;

pub use result::LatticeGreeks;

use pricer_core::traits::LatticeFunction;
use pricer_core::types::LatticeError;

use crate::induction::BackwardInduction;
use crate::tree::TreeProvider;

/// Minimum number of steps for lattice Greeks.
pub const MIN_GREEKS_STEPS: usize = 2;

impl LatticeGreeks {
    /// Prices `function` on `tree` and derives delta, gamma and theta.
    ///
    /// Only layers 0 to 2 are kept, so memory stays linear in `n`.
    ///
    /// # Errors
    /// - `InsufficientLayers` if the tree has fewer than two steps
    /// - Any error of [`BackwardInduction`]
    ///
    /// # Examples
    /// ```
    /// use pricer_core::math::UniformProbabilities;
    /// use pricer_models::instruments::{EuropeanOption, OptionParams, PutCall};
    /// use pricer_pricing::greeks::LatticeGreeks;
    /// use pricer_pricing::tree::UniformTrinomialTree;
    ///
    /// let call = EuropeanOption::new(OptionParams::new(100.0, 1.0).unwrap(), PutCall::Call);
    /// let tree = UniformTrinomialTree::new(
    ///     100.0, 0.95, 1.0, 100, UniformProbabilities::new(0.25, 0.5, 0.25), 0.9995,
    /// )
    /// .unwrap();
    ///
    /// let greeks = LatticeGreeks::compute(&call, &tree).unwrap();
    /// assert!(greeks.delta > 0.0 && greeks.delta < 1.0);
    /// assert!(greeks.gamma > 0.0);
    /// ```
    pub fn compute<F, P>(function: &F, tree: &P) -> Result<Self, LatticeError>
    where
        F: LatticeFunction<Node = f64>,
        P: TreeProvider,
    {
        check_greeks_steps(tree.number_of_steps())?;

        let mut induction = BackwardInduction::new(function, tree)?;
        while induction.layer() > 2 {
            induction.step()?;
        }
        Self::from_layer_two(induction, tree)
    }

    /// Finishes a walk that has reached layer 2 and reads the Greeks off
    /// layers 2, 1 and 0.
    pub(crate) fn from_layer_two<F, P>(
        mut induction: BackwardInduction<'_, F, P>,
        tree: &P,
    ) -> Result<Self, LatticeError>
    where
        F: LatticeFunction<Node = f64>,
        P: TreeProvider,
    {
        debug_assert_eq!(induction.layer(), 2);
        let steps = tree.number_of_steps();
        let time_to_expiry = induction.function().time_to_expiry();

        let v2 = induction.nodes().to_vec();
        induction.step()?;
        let v1 = induction.nodes().to_vec();
        induction.step()?;
        let price = induction.finish();

        let s1 = tree.state_values(1);
        let s2 = tree.state_values(2);

        let delta = (v1[2] - v1[0]) / (s1[2] - s1[0]);
        let delta_up = (v2[4] - v2[2]) / (s2[4] - s2[2]);
        let delta_down = (v2[2] - v2[0]) / (s2[2] - s2[0]);
        let gamma = 2.0 * (delta_up - delta_down) / (s2[4] - s2[0]);
        let dt = time_to_expiry / steps as f64;
        let theta = (v2[2] - price) / (2.0 * dt);

        Ok(Self {
            price,
            delta,
            gamma,
            theta,
        })
    }
}

/// Rejects trees too short for lattice Greeks.
pub(crate) fn check_greeks_steps(steps: usize) -> Result<(), LatticeError> {
    if steps < MIN_GREEKS_STEPS {
        Err(LatticeError::InsufficientLayers {
            required: MIN_GREEKS_STEPS,
            available: steps,
        })
    } else {
        Ok(())
    }
}
