//! # pricer_core: Lattice Foundation
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the trinomial lattice engine, providing:
//! - Layer arithmetic and geometric state values (`math::lattice`)
//! - Transition-probability matrices (`math::matrix`)
//! - Option-function contracts and the default continuation step (`traits`)
//! - Error types: `LatticeError` (`types::error`)
//!
//! ## Dependencies
//!
//! Layer 1 has no dependencies on other pricer_* crates:
//! - num-traits: generic floating-point state values
//! - rayon: data-parallel continuation over wide layers
//! - thiserror: error derives
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::{discounted_expectation, TransitionMatrix, UniformProbabilities};
//!
//! // One step back from a three-node terminal layer
//! let probs = TransitionMatrix::uniform(1, UniformProbabilities::new(0.25, 0.5, 0.25));
//! let root = discounted_expectation(0.99, &probs, &[9.0, 10.0, 12.0], 0);
//! assert!((root[0] - 10.1475).abs() < 1e-12);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod traits;
pub mod types;
