//! # Domain Layer (Inner Hexagon)
//!
//! The routing table and the update blob format. No host access.

pub mod blob;
pub mod registry;

pub use blob::*;
pub use registry::*;
