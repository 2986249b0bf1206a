//! Contracts between option functions and the backward-induction driver.
//!
//! All traits are intended for static dispatch: the driver is generic over
//! [`LatticeFunction`] and monomorphised per contract type.

pub mod option_function;

pub use option_function::{ContractTerms, GeometricLayer, LatticeFunction, OptionFunction};
