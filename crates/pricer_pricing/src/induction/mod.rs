//! Backward induction over a trinomial tree.
//!
//! - `driver`: the layer-by-layer state machine and the `price` /
//!   `all_layer_values` entry points
//! - `timeboxed`: the same walk under a step budget and a wall-clock deadline

mod driver;
mod timeboxed;

pub use driver::{all_layer_values, price, BackwardInduction, LatticeLayers};
pub use timeboxed::TimeBoxedInduction;
