//! # Dispatch Proxy
//!
//! The stable address of a router. Holds the routing table and the owner,
//! and forwards every call by DELEGATECALL to the module registered for the
//! call's identifier.
//!
//! ## Routing
//!
//! 1. Empty calldata routes [`Selector::RECEIVE`], anything else its leading
//!    4 bytes (zero-padded).
//! 2. An unregistered identifier retries with [`Selector::FALLBACK`].
//! 3. Still unregistered: the call fails with `NoRoute`.
//!
//! The delegate sees the original calldata, caller and value, and its return
//! data or revert payload comes back unchanged.

use super::load_registry;
use super::ownable;
use super::store_registry;
use super::update::UPDATE_SIGNATURE;
use crate::errors::RegistryError;
use fr_01_execution_host::codec::{decode_constructor_args, encode_args, Revert};
use fr_01_execution_host::domain::abi::{selector_of, FunctionDescriptor};
use fr_01_execution_host::domain::value_objects::{Address, Bytes, Selector};
use fr_01_execution_host::errors::CodecError;
use fr_01_execution_host::host::Frame;
use fr_01_execution_host::module::{init_code, NativeModule};
use tracing::debug;

/// The dispatch proxy module.
#[derive(Clone, Copy, Debug, Default)]
pub struct DispatchProxy;

impl DispatchProxy {
    /// Catalog name.
    pub const NAME: &'static str = "ERC1538Proxy";

    /// Init code of a proxy whose `updateContract` routes to `update_delegate`.
    pub fn deployment(update_delegate: Address) -> Result<Bytes, CodecError> {
        Ok(init_code(Self::NAME, encode_args(&(update_delegate,))?))
    }
}

/// Identifier a call is routed by.
#[must_use]
pub fn routing_id(calldata: &[u8]) -> Selector {
    if calldata.is_empty() {
        Selector::RECEIVE
    } else {
        Selector::from_calldata(calldata)
    }
}

impl NativeModule for DispatchProxy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn functions(&self) -> Vec<FunctionDescriptor> {
        Vec::new()
    }

    /// Sets the deployer as owner and registers the update entry point.
    fn construct(&self, frame: &mut Frame<'_>) -> Result<(), Revert> {
        let (update_delegate,): (Address,) =
            decode_constructor_args(frame.calldata().as_slice())?;

        let deployer = frame.caller();
        ownable::initialize(frame, deployer)?;

        let mut registry = load_registry(frame)?;
        if let Some(update) = registry.set_function(
            selector_of(UPDATE_SIGNATURE),
            UPDATE_SIGNATURE,
            update_delegate,
        ) {
            frame.emit(&update)?;
        }
        store_registry(frame, &registry)?;
        Ok(())
    }

    fn execute(&self, frame: &mut Frame<'_>) -> Result<Bytes, Revert> {
        let data = frame.calldata().clone();
        let id = routing_id(data.as_slice());

        let registry = load_registry(frame)?;
        let delegate = registry
            .delegate_of(id)
            .or_else(|| registry.delegate_of(Selector::FALLBACK))
            .ok_or(RegistryError::NoRoute(id))?;

        debug!(id = %id, delegate = ?delegate, depth = frame.depth(), "Dispatching call");
        Ok(frame.delegate_call(delegate, data)?)
    }
}

// =============================================================================
// TESTS
// =============================================================================
