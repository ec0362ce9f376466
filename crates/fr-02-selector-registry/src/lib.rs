//! # FR-02 Selector Registry - ERC-1538 Transparent Router Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! A router is one stable address whose functionality is spread over any
//! number of delegate modules. The proxy keeps a table from 4-byte function
//! identifiers to delegates, forwards each call by DELEGATECALL, and lets its
//! owner add, replace and remove routes at any time without changing the
//! address callers use.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Entries, positions and delegate index stay in lockstep | `domain/registry.rs` - `set_function()` |
//! | No live entry has a zero delegate | `domain/registry.rs` - `set_function()` |
//! | Only the owner mutates routes or ownership | `modules/ownable.rs` - `only_owner()` |
//! | Updates are all-or-nothing | host frame checkpoint around `updateContract` |
//! | Delegate output and reverts are relayed verbatim | `modules/proxy.rs` - `execute()` |
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Registry | `domain/registry.rs` | Routing table and queries |
//! | Update blob | `domain/blob.rs` | `sig;sig;...` parsing |
//! | Proxy | `modules/proxy.rs` | Dispatch with receive/fallback |
//! | Update delegate | `modules/update.rs` | `updateContract` |
//! | Query delegate | `modules/query.rs` | Registry views |
//! | Access control | `modules/ownable.rs` | Single owner |
//! | Client | `client.rs` | Typed calls from outside the host |
//!
//! ## Usage Example
//!
//! ```ignore
//! use fr_02_selector_registry::prelude::*;
//!
//! let mut host = Host::new(VmConfig::default(), router_catalog());
//! let router = deploy_router(&mut host, owner)?;
//! let mut client = RouterClient::new(&mut host, router.proxy, owner);
//! client.update_contract(delegate, "set(bytes);get();", "Add storage")?;
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
pub mod modules;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::blob::{parse_signature_blob, SignatureToken};
    pub use crate::domain::registry::{
        signature_id, FunctionEntry, FunctionRegistry, FALLBACK_TOKEN, RECEIVE_TOKEN,
    };

    // Events
    pub use crate::events::{CommitMessage, FunctionUpdate, OwnershipTransferred};

    // Modules
    pub use crate::modules::update::UPDATE_SIGNATURE;
    pub use crate::modules::{router_catalog, DispatchProxy, QueryDelegate, UpdateDelegate};

    // Client
    pub use crate::client::{deploy_router, RouterClient, RouterDeployment};

    // Errors
    pub use crate::errors::RegistryError;
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 2;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Selector Registry";

// =============================================================================
// TESTS
// =============================================================================
