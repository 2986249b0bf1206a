//! Lattice arithmetic.
//!
//! - `lattice`: node counts, geometric state values, the default
//!   discounted-expectation kernel
//! - `matrix`: per-layer transition-probability matrices

pub mod lattice;
pub mod matrix;

pub use lattice::{
    assert_layer_shape, discounted_expectation, geometric_state_values, node_count,
    PARALLEL_MIN_NODES,
};
pub use matrix::{TransitionMatrix, UniformProbabilities};
