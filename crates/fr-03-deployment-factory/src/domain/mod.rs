//! # Domain Layer (Inner Hexagon)
//!
//! Address derivation. Pure functions, no host access.

pub mod predictor;

pub use predictor::*;
