//! Core error types.
//!
//! # Re-exports
//!
//! - [`LatticeError`] from `error`

pub mod error;

pub use error::LatticeError;
