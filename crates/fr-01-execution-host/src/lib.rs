//! # FR-01 Execution Host - Deterministic Contract Execution Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! A small, self-contained stand-in for a contract virtual machine. Accounts
//! hold balances, nonces, storage and a code image naming a native module.
//! Frames run module code with CALL, DELEGATECALL, STATICCALL and CREATE2
//! semantics over journaled state, and every transaction is all-or-nothing.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | No state change or log survives a failed frame | `host/mod.rs` - `run_frame()` |
//! | Static frames cannot write | `host/frame.rs` - `ensure_writable()` |
//! | Call depth limit | `host/mod.rs` - `run_frame()` |
//! | One CREATE2 derivation for host and predictors | `domain/services.rs` - `compute_create2_address()` |
//! | Selector = `keccak256(signature)[..4]` | `domain/abi.rs` - `selector_of()` |
//!
//! ### Execution Safety Limits
//!
//! | Limit | Value | Purpose |
//! |-------|-------|---------|
//! | `max_call_depth` | 1024 | Bound recursion |
//! | `max_code_size` | 24 KB (EIP-170) | Limit contract size |
//! | `max_init_code_size` | 48 KB (EIP-3860) | Limit deployment code |
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Host | `host/mod.rs` | Transactions, frames, creation |
//! | Frame | `host/frame.rs` | Module-facing API |
//! | World state | `host/state.rs` | Accounts and undo journal |
//! | Modules | `module.rs` | `NativeModule`, code images, catalog |
//! | Codec | `codec.rs` | Calldata, return data, reverts |
//! | Signature codec | `domain/abi.rs` | Canonical signatures, selectors |
//! | Service | `service.rs` | Async, totally ordered submission |
//!
//! ## Usage Example
//!
//! ```ignore
//! use fr_01_execution_host::prelude::*;
//!
//! let mut host = Host::new(VmConfig::default(), ModuleCatalog::new().with(MyModule));
//! let receipt = host.deploy(deployer, MyModule.init_code(Bytes::new()), U256::zero());
//! let value: u64 = host.call_function(user, receipt.contract_address.unwrap(), "get()", &())?;
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

pub mod codec;
pub mod domain;
pub mod errors;
pub mod events;
pub mod host;
pub mod module;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        Account, ExecutionContext, Log, Receipt, Transaction, VmConfig,
    };

    // Value objects
    pub use crate::domain::value_objects::{Address, Bytes, Hash, Selector, StorageKey, U256};

    // Domain services
    pub use crate::domain::services::{
        compute_contract_address, compute_create2_address, keccak256, keccak256_concat,
    };

    // Signature codec
    pub use crate::domain::abi::{
        canonicalize, selector_of, signature_list, signatures_from_abi_json, FunctionDescriptor,
        ParamType,
    };

    // Calling convention
    pub use crate::codec::{
        decode_args, decode_constructor_args, decode_return, encode_args, encode_call,
        encode_call_with_selector, encode_return, Revert,
    };

    // Events
    pub use crate::events::Event;

    // Host
    pub use crate::host::{Frame, Host};
    pub use crate::module::{init_code, runtime_code, ModuleCatalog, NativeModule};

    // Ports
    pub use crate::ports::inbound::ExecutionApi;

    // Errors
    pub use crate::errors::{AbiError, ClientError, CodecError, ParseError, VmError};

    // Service
    pub use crate::service::{ExecutionService, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 1;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Execution Host";

// =============================================================================
// TESTS
// =============================================================================
