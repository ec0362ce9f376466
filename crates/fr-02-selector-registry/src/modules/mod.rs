//! # Router Modules
//!
//! The native modules making up an ERC-1538 router, and the storage layout
//! they share. Delegates run through DELEGATECALL in the proxy's storage, so
//! every module here must agree on these slots.
//!
//! | Module | Role |
//! |--------|------|
//! | [`DispatchProxy`] | Routes every call by identifier |
//! | [`UpdateDelegate`] | `updateContract` plus ownership |
//! | [`QueryDelegate`] | Read-only registry queries plus ownership |

pub mod ownable;
pub mod proxy;
pub mod query;
pub mod update;

pub use proxy::DispatchProxy;
pub use query::QueryDelegate;
pub use update::UpdateDelegate;

use crate::domain::registry::FunctionRegistry;
use fr_01_execution_host::domain::abi::FunctionDescriptor;
use fr_01_execution_host::domain::value_objects::{Selector, StorageKey};
use fr_01_execution_host::errors::VmError;
use fr_01_execution_host::host::Frame;
use fr_01_execution_host::module::ModuleCatalog;
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Slot holding the routing table.
    pub static ref REGISTRY_SLOT: StorageKey = StorageKey::namespaced("fr.selector-registry.functions");

    /// Slot holding the owner address.
    pub static ref OWNER_SLOT: StorageKey = StorageKey::namespaced("fr.access-control.owner");
}

/// Loads the routing table of the frame's account.
pub fn load_registry(frame: &Frame<'_>) -> Result<FunctionRegistry, VmError> {
    frame.sload(*REGISTRY_SLOT)
}

/// Stores the routing table of the frame's account.
pub fn store_registry(frame: &mut Frame<'_>, registry: &FunctionRegistry) -> Result<(), VmError> {
    frame.sstore(*REGISTRY_SLOT, registry)
}

/// Catalog with the three router modules.
#[must_use]
pub fn router_catalog() -> ModuleCatalog {
    ModuleCatalog::new()
        .with(DispatchProxy)
        .with(UpdateDelegate)
        .with(QueryDelegate)
}

/// Selector-keyed dispatch table built from a module's ABI.
fn dispatch_table<F: Copy>(functions: &[(FunctionDescriptor, F)]) -> HashMap<Selector, F> {
    functions
        .iter()
        .map(|(descriptor, function)| (descriptor.selector(), *function))
        .collect()
}
