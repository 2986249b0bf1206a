//! Backward induction under a step budget and a wall-clock deadline.

use std::time::{Duration, Instant};

use pricer_core::traits::LatticeFunction;
use pricer_core::types::LatticeError;
use tracing::warn;

use super::driver::BackwardInduction;
use crate::config::LatticeConfig;
use crate::greeks::{check_greeks_steps, LatticeGreeks};
use crate::tree::TreeProvider;

/// Budgeted wrapper around [`BackwardInduction`].
///
/// Trees with more than `max_steps` steps are rejected before any work is
/// done. The deadline is checked between layers only; a single layer is
/// never interrupted, and the numeric result of a walk that finishes in
/// time is identical to the unbudgeted one.
///
/// # Examples
/// ```
/// use pricer_core::math::UniformProbabilities;
/// use pricer_core::types::LatticeError;
/// use pricer_models::instruments::{EuropeanOption, OptionParams, PutCall};
/// use pricer_pricing::induction::TimeBoxedInduction;
/// use pricer_pricing::tree::UniformTrinomialTree;
///
/// let option = EuropeanOption::new(OptionParams::new(100.0, 1.0).unwrap(), PutCall::Put);
/// let tree = UniformTrinomialTree::new(
///     100.0, 0.95, 1.0, 50, UniformProbabilities::new(0.25, 0.5, 0.25), 0.999,
/// )
/// .unwrap();
///
/// let boxed = TimeBoxedInduction::new(20, None);
/// assert!(matches!(
///     boxed.price(&option, &tree),
///     Err(LatticeError::StepLimitExceeded { steps: 50, max_steps: 20 })
/// ));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBoxedInduction {
    max_steps: usize,
    time_budget: Option<Duration>,
}

impl TimeBoxedInduction {
    /// Creates a wrapper with an explicit step limit and optional deadline.
    pub fn new(max_steps: usize, time_budget: Option<Duration>) -> Self {
        Self {
            max_steps,
            time_budget,
        }
    }

    /// Creates a wrapper from the budgets in `config`.
    pub fn from_config(config: &LatticeConfig) -> Self {
        Self::new(
            config.max_steps,
            config.time_budget_ms.map(Duration::from_millis),
        )
    }

    /// Returns the step limit.
    #[inline]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Returns the wall-clock budget, if any.
    #[inline]
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    /// Prices `function` on `tree` within the budgets.
    ///
    /// # Errors
    /// - `StepLimitExceeded` if the tree has more than `max_steps` steps
    /// - `DeadlineExceeded` if the budget runs out before the root
    /// - Any error of [`BackwardInduction`]
    pub fn price<F, P>(&self, function: &F, tree: &P) -> Result<f64, LatticeError>
    where
        F: LatticeFunction,
        P: TreeProvider,
    {
        let deadline = self.start(tree)?;
        let mut induction = BackwardInduction::new(function, tree)?;
        self.walk_until(&mut induction, 0, deadline)?;
        Ok(induction.finish())
    }

    /// Computes [`LatticeGreeks`] within the budgets.
    ///
    /// The deadline is checked down to layer 2; the last two layers are
    /// always completed.
    ///
    /// # Errors
    /// As [`price`](Self::price), plus `InsufficientLayers` for trees of
    /// fewer than two steps.
    pub fn greeks<F, P>(&self, function: &F, tree: &P) -> Result<LatticeGreeks, LatticeError>
    where
        F: LatticeFunction<Node = f64>,
        P: TreeProvider,
    {
        check_greeks_steps(tree.number_of_steps())?;
        let deadline = self.start(tree)?;
        let mut induction = BackwardInduction::new(function, tree)?;
        self.walk_until(&mut induction, 2, deadline)?;
        LatticeGreeks::from_layer_two(induction, tree)
    }

    /// Checks the step budget and starts the clock.
    fn start<P: TreeProvider>(&self, tree: &P) -> Result<Option<Instant>, LatticeError> {
        let steps = tree.number_of_steps();
        if steps > self.max_steps {
            warn!(steps, max_steps = self.max_steps, "tree exceeds step budget");
            return Err(LatticeError::StepLimitExceeded {
                steps,
                max_steps: self.max_steps,
            });
        }
        Ok(self.time_budget.map(|budget| Instant::now() + budget))
    }

    fn walk_until<F, P>(
        &self,
        induction: &mut BackwardInduction<'_, F, P>,
        target: usize,
        deadline: Option<Instant>,
    ) -> Result<(), LatticeError>
    where
        F: LatticeFunction,
        P: TreeProvider,
    {
        while induction.layer() > target {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    let remaining_layers = induction.layer();
                    warn!(remaining_layers, "time budget exhausted");
                    return Err(LatticeError::DeadlineExceeded {
                        budget_ms: self.time_budget.map_or(0, |b| b.as_millis() as u64),
                        remaining_layers,
                    });
                }
            }
            induction.step()?;
        }
        Ok(())
    }
}

impl From<&LatticeConfig> for TimeBoxedInduction {
    fn from(config: &LatticeConfig) -> Self {
        Self::from_config(config)
    }
}
