//! Option contracts for lattice valuation.
//!
//! | Contract | Node | Continuation |
//! |----------|------|--------------|
//! | [`EuropeanOption`] | `f64` | discounted expectation |
//! | [`AmericanOption`] | `f64` | max(continuation, intrinsic) |
//! | [`BermudanOption`] | `f64` | American rule on exercise layers only |
//! | [`BarrierKnockOutOption`] | `f64` | rebate where the barrier is touched |
//! | [`AsianArithmeticOption`] | [`AsianNode`] | forward-shooting average grid |

pub mod american;
pub mod asian;
pub mod barrier;
pub mod bermudan;
pub mod error;
pub mod european;
pub mod params;
pub mod payoff;

pub use american::AmericanOption;
pub use asian::{AsianArithmeticOption, AsianNode, DEFAULT_AVERAGE_POINTS};
pub use barrier::{BarrierKnockOutOption, BarrierType};
pub use bermudan::BermudanOption;
pub use error::InstrumentError;
pub use european::EuropeanOption;
pub use params::OptionParams;
pub use payoff::PutCall;
