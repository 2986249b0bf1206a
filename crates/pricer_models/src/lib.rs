//! # Pricer Models (L2: Contracts)
//!
//! Option contracts valued by the trinomial backward-induction engine.
//!
//! This crate provides:
//! - Validated contract parameters ([`instruments::OptionParams`])
//! - Put/call payoff direction ([`instruments::PutCall`])
//! - The contract variants, each implementing the
//!   [`pricer_core::traits::LatticeFunction`] capability set:
//!   European, American, Bermudan, knock-out barrier and arithmetic Asian
//!
//! ## Design Principles
//!
//! - **One struct per variant**, statically dispatched through the
//!   option-function traits; the driver never matches on the variant
//! - **Validation at construction**: invalid contracts never reach the
//!   recursion

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod instruments;
