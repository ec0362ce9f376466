//! # Domain Layer (Inner Hexagon)
//!
//! Pure logic of the execution host.
//! NO I/O, NO async, NO host state.
//!
//! - `abi`: canonical signatures and 4-byte identifiers
//! - `entities`: contexts, accounts, transactions, receipts, limits
//! - `services`: hashing and contract address derivation
//! - `value_objects`: addresses, hashes, selectors, bytes

pub mod abi;
pub mod entities;
pub mod services;
pub mod value_objects;

pub use abi::*;
pub use entities::*;
pub use services::*;
pub use value_objects::*;
