//! # FR-03 Deployment Factory - Deterministic Deployment Subsystem
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! Creates contract instances at addresses computable before deployment,
//! optionally initializing them with one call in the same atomic step, and
//! exposes the address derivation on its own for callers that only need
//! the prediction.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Prediction equals the deployed address | `domain/predictor.rs` - shares `compute_create2_address()` with the host |
//! | A taken address is never overwritten | host `ensure_vacant()` -> `FactoryError::AddressOccupied` |
//! | Deploy-and-call is all-or-nothing | `factory.rs` - `create_contract_and_call()` |
//!
//! ## Usage Example
//!
//! ```ignore
//! use fr_03_deployment_factory::prelude::*;
//!
//! let predicted = AddressPredictor::predict_code(factory, code.as_slice(), salt);
//! let (address, _) = FactoryClient::new(&mut host, factory, sender).create_contract(&code, salt)?;
//! assert_eq!(address, predicted);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod client;
pub mod domain;
pub mod errors;
pub mod events;
pub mod factory;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::client::FactoryClient;
    pub use crate::domain::predictor::AddressPredictor;
    pub use crate::errors::FactoryError;
    pub use crate::events::NewContract;
    pub use crate::factory::GenericFactory;
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 3;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Deployment Factory";

// =============================================================================
// TESTS
// =============================================================================
