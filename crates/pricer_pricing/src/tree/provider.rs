use std::borrow::Cow;

use pricer_core::math::TransitionMatrix;

/// Source of the numeric tree data consumed by backward induction.
///
/// A tree of `n` steps has layers `0..=n`; layer `i` has `2i+1` nodes
/// ordered from lowest to highest state. Transition data and discount
/// factors exist for layers `0..n` and describe the step from layer `i` to
/// layer `i+1`.
///
/// Providers either store per-layer data (and lend it) or rebuild it on
/// demand (and hand out owned values), hence the [`Cow`] returns.
pub trait TreeProvider {
    /// Number of steps `n`.
    fn number_of_steps(&self) -> usize;

    /// State value at the root node.
    fn spot(&self) -> f64;

    /// State values of layer `layer`, `2*layer + 1` entries.
    fn state_values(&self, layer: usize) -> Cow<'_, [f64]>;

    /// Transition probabilities from layer `layer` to `layer + 1`,
    /// `2*layer + 1` rows.
    fn transition_probability(&self, layer: usize) -> Cow<'_, TransitionMatrix>;

    /// Discount factor applied when stepping back from `layer + 1` to `layer`.
    fn discount_factor(&self, layer: usize) -> f64;
}
