//! # Pricer Pricing (Layer 3: Lattice Engine)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing walks a trinomial tree from expiry back to the valuation
//! date:
//! - Tree providers: explicit per-layer data or a uniform geometric tree
//!   (`tree`)
//! - The backward-induction state machine, `price` and `all_layer_values`
//!   (`induction`)
//! - A time-boxed driver bounded by a step budget and a deadline
//!   (`induction::TimeBoxedInduction`)
//! - Delta, gamma and theta from the first lattice layers (`greeks`)
//! - Engine configuration from TOML and the environment (`config`)
//!
//! The driver is written once against
//! [`pricer_core::traits::LatticeFunction`] and knows nothing about the
//! contract it values.
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::math::UniformProbabilities;
//! use pricer_models::instruments::{AmericanOption, EuropeanOption, OptionParams, PutCall};
//! use pricer_pricing::induction::price;
//! use pricer_pricing::tree::UniformTrinomialTree;
//!
//! let params = OptionParams::new(100.0, 1.0).unwrap();
//! let tree = UniformTrinomialTree::new(
//!     100.0, 0.96, 1.0, 200, UniformProbabilities::new(0.26, 0.5, 0.24), 0.9998,
//! )
//! .unwrap();
//!
//! let european = price(&EuropeanOption::new(params, PutCall::Put), &tree).unwrap();
//! let american = price(&AmericanOption::new(params, PutCall::Put), &tree).unwrap();
//! assert!(american >= european);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod greeks;
pub mod induction;
pub mod tree;

pub use config::{ConfigError, LatticeConfig, LogLevel};
pub use greeks::LatticeGreeks;
pub use induction::{
    all_layer_values, price, BackwardInduction, LatticeLayers, TimeBoxedInduction,
};
pub use tree::{TreeProvider, TrinomialTreeData, UniformTrinomialTree};
