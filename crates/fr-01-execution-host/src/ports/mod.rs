//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for driving the execution host.
//!
//! - **Driving Ports (Inbound)**: `ExecutionApi`
//! - No concrete implementations in this module

pub mod inbound;

pub use inbound::*;
