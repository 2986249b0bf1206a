//! Layer arithmetic for recombining trinomial trees.
//!
//! Layer `i` of a trinomial tree holds `2i+1` nodes ordered from the lowest
//! (all down moves) to the highest (all up moves). Node `j` of layer `i`
//! branches to nodes `j`, `j+1`, `j+2` of layer `i+1`. Layers are plain
//! contiguous slices indexed by integer offset.

use num_traits::Float;
use rayon::prelude::*;

use super::matrix::TransitionMatrix;

/// Layer width from which [`discounted_expectation`] runs data-parallel.
///
/// Below this width the fork/join overhead dominates the three
/// multiply-adds per node.
pub const PARALLEL_MIN_NODES: usize = 4096;

/// Number of nodes in layer `layer`, i.e. `2 * layer + 1`.
///
/// # Examples
/// ```
/// use pricer_core::math::node_count;
///
/// assert_eq!(node_count(0), 1);
/// assert_eq!(node_count(3), 7);
/// ```
#[inline]
pub const fn node_count(layer: usize) -> usize {
    2 * layer + 1
}

/// Geometric state values of a layer.
///
/// Node `k` of layer `layer` is placed at
/// `spot * down_factor^(layer - k) * middle_factor^k` for `k = 0..2*layer`.
/// Every node is computed independently from the two powers; no value is
/// derived from its neighbour, so rounding error does not accumulate across
/// the layer.
///
/// # Examples
/// ```
/// use pricer_core::math::geometric_state_values;
///
/// let states = geometric_state_values(100.0_f64, 0.5, 1.0, 1);
/// assert_eq!(states, vec![50.0, 100.0, 200.0]);
/// ```
pub fn geometric_state_values<T: Float>(
    spot: T,
    down_factor: T,
    middle_factor: T,
    layer: usize,
) -> Vec<T> {
    let layer = layer as i64;
    (0..node_count(layer as usize) as i64)
        .map(|k| {
            let down_power = T::from(layer - k).unwrap_or_else(T::nan);
            let middle_power = T::from(k).unwrap_or_else(T::nan);
            spot * down_factor.powf(down_power) * middle_factor.powf(middle_power)
        })
        .collect()
}

/// Asserts that a layer array has the `2i+1` nodes of layer `layer`.
///
/// # Panics
/// Panics with a descriptive message on mismatch. Shapes are the driver's
/// responsibility, so a mismatch is a programming error.
#[inline]
#[track_caller]
pub fn assert_layer_shape(what: &str, len: usize, layer: usize) {
    assert_eq!(
        len,
        node_count(layer),
        "{} for layer {} must have {} nodes, got {}",
        what,
        layer,
        node_count(layer),
        len
    );
}

/// Risk-neutral discounted expectation over the three successors.
///
/// Computes, for every node `j` of layer `layer`,
///
/// ```text
/// result[j] = df * (p_up[j] * values[j+2] + p_mid[j] * values[j+1] + p_down[j] * values[j])
/// ```
///
/// where `values` is the (already computed) layer `layer + 1`. Layers of at
/// least [`PARALLEL_MIN_NODES`] nodes are split across the rayon pool; each
/// node only reads its three successors, so both paths produce identical
/// output.
///
/// # Panics
/// Panics if `values` does not have `2*layer + 3` entries or
/// `transition_probability` does not have `2*layer + 1` rows.
///
/// # Examples
/// ```
/// use pricer_core::math::{discounted_expectation, TransitionMatrix, UniformProbabilities};
///
/// let probs = TransitionMatrix::uniform(1, UniformProbabilities::new(0.25, 0.5, 0.25));
/// let root = discounted_expectation(0.99, &probs, &[9.0, 10.0, 12.0], 0);
/// assert!((root[0] - 10.1475).abs() < 1e-12);
/// ```
pub fn discounted_expectation(
    discount_factor: f64,
    transition_probability: &TransitionMatrix,
    values: &[f64],
    layer: usize,
) -> Vec<f64> {
    assert_layer_shape("option values", values.len(), layer + 1);
    assert_layer_shape(
        "transition probabilities",
        transition_probability.rows(),
        layer,
    );

    let node = |j: usize| {
        let [down, middle, up] = transition_probability.row(j);
        discount_factor * (up * values[j + 2] + middle * values[j + 1] + down * values[j])
    };

    let n_nodes = node_count(layer);
    if n_nodes >= PARALLEL_MIN_NODES {
        (0..n_nodes).into_par_iter().map(node).collect()
    } else {
        (0..n_nodes).map(node).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix::UniformProbabilities;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_node_count() {
        assert_eq!(node_count(0), 1);
        assert_eq!(node_count(1), 3);
        assert_eq!(node_count(10), 21);
    }

    #[test]
    fn test_geometric_root_is_spot() {
        let states = geometric_state_values(100.0_f64, 0.9, 1.1, 0);
        assert_eq!(states, vec![100.0]);
    }

    #[test]
    fn test_geometric_power_ordering() {
        let (spot, d, m) = (100.0_f64, 0.9, 1.05);
        let states = geometric_state_values(spot, d, m, 2);
        assert_eq!(states.len(), 5);
        for (k, &s) in states.iter().enumerate() {
            let expected = spot * d.powf(2.0 - k as f64) * m.powf(k as f64);
            assert_eq!(s, expected);
        }
    }

    #[test]
    fn test_geometric_centre_with_unit_middle_factor() {
        // middle factor of one places the centre node at the spot
        let states = geometric_state_values(100.0_f64, 0.8, 1.0, 3);
        assert_relative_eq!(states[3], 100.0, epsilon = 1e-12);
        assert_relative_eq!(states[6], 100.0 / 0.8_f64.powi(3), epsilon = 1e-9);
        assert_relative_eq!(states[0], 100.0 * 0.8_f64.powi(3), epsilon = 1e-9);
    }

    #[test]
    fn test_geometric_f32() {
        let states = geometric_state_values(10.0_f32, 0.5, 1.0, 1);
        assert_eq!(states, vec![5.0_f32, 10.0, 20.0]);
    }

    #[test]
    fn test_discounted_expectation_single_step() {
        let probs = TransitionMatrix::uniform(1, UniformProbabilities::new(0.25, 0.5, 0.25));
        let root = discounted_expectation(0.99, &probs, &[9.0, 10.0, 12.0], 0);
        assert_eq!(root.len(), 1);
        assert_relative_eq!(root[0], 10.1475, epsilon = 1e-12);
    }

    #[test]
    fn test_discounted_expectation_per_node_rows() {
        let probs = TransitionMatrix::from_rows(&[
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ]);
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let out = discounted_expectation(1.0, &probs, &values, 1);
        // row 0 picks j, row 1 picks j+1, row 2 picks j+2
        assert_eq!(out, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let layer = PARALLEL_MIN_NODES; // wide enough to take the rayon path
        let probs = TransitionMatrix::uniform(
            node_count(layer),
            UniformProbabilities::new(0.3, 0.45, 0.25),
        );
        let values: Vec<f64> = (0..node_count(layer + 1))
            .map(|k| (k as f64 * 0.37).sin() * 10.0)
            .collect();
        let parallel = discounted_expectation(0.995, &probs, &values, layer);
        for (j, &v) in parallel.iter().enumerate() {
            let expected =
                0.995 * (0.25 * values[j + 2] + 0.45 * values[j + 1] + 0.3 * values[j]);
            assert_eq!(v, expected);
        }
    }

    #[test]
    #[should_panic(expected = "option values for layer 2")]
    fn test_discounted_expectation_rejects_short_values() {
        let probs = TransitionMatrix::uniform(3, UniformProbabilities::middle_only());
        let _ = discounted_expectation(1.0, &probs, &[1.0, 2.0, 3.0, 4.0], 1);
    }

    #[test]
    #[should_panic(expected = "transition probabilities for layer 1")]
    fn test_discounted_expectation_rejects_short_matrix() {
        let probs = TransitionMatrix::uniform(2, UniformProbabilities::middle_only());
        let _ = discounted_expectation(1.0, &probs, &[1.0, 2.0, 3.0, 4.0, 5.0], 1);
    }

    proptest! {
        #[test]
        fn prop_state_values_have_layer_width(layer in 0usize..200) {
            let states = geometric_state_values(100.0_f64, 0.97, 1.0, layer);
            prop_assert_eq!(states.len(), 2 * layer + 1);
        }

        #[test]
        fn prop_expectation_has_layer_width(layer in 0usize..200, df in 0.5f64..1.0) {
            let probs = TransitionMatrix::uniform(
                node_count(layer),
                UniformProbabilities::new(0.2, 0.5, 0.3),
            );
            let values = vec![1.0; node_count(layer + 1)];
            let out = discounted_expectation(df, &probs, &values, layer);
            prop_assert_eq!(out.len(), 2 * layer + 1);
            for v in out {
                prop_assert!((v - df).abs() < 1e-12);
            }
        }
    }
}
