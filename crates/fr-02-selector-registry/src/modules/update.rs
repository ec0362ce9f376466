//! # Update Delegate
//!
//! Mutates the routing table of the account it runs in. Deployed once and
//! reached through the proxy, which registers `updateContract` to it at
//! construction.

use super::ownable::{self, OwnershipCall};
use super::{dispatch_table, load_registry, store_registry};
use crate::domain::blob::parse_signature_blob;
use crate::events::CommitMessage;
use fr_01_execution_host::codec::{decode_args, Revert};
use fr_01_execution_host::domain::abi::{FunctionDescriptor, ParamType};
use fr_01_execution_host::domain::value_objects::{Address, Bytes, Selector};
use fr_01_execution_host::host::Frame;
use fr_01_execution_host::module::NativeModule;
use lazy_static::lazy_static;
use std::collections::HashMap;
use tracing::{debug, info};

/// Canonical signature of the update entry point.
pub const UPDATE_SIGNATURE: &str = "updateContract(address,string,string)";

#[derive(Clone, Copy, Debug)]
enum UpdateFunction {
    Ownership(OwnershipCall),
    UpdateContract,
}

fn abi() -> Vec<(FunctionDescriptor, UpdateFunction)> {
    vec![
        (
            OwnershipCall::Owner.descriptor(),
            UpdateFunction::Ownership(OwnershipCall::Owner),
        ),
        (
            OwnershipCall::RenounceOwnership.descriptor(),
            UpdateFunction::Ownership(OwnershipCall::RenounceOwnership),
        ),
        (
            OwnershipCall::TransferOwnership.descriptor(),
            UpdateFunction::Ownership(OwnershipCall::TransferOwnership),
        ),
        (update_contract_descriptor(), UpdateFunction::UpdateContract),
    ]
}

lazy_static! {
    static ref DISPATCH: HashMap<Selector, UpdateFunction> = dispatch_table(&abi());
}

/// ABI entry of `updateContract(address,string,string)`.
#[must_use]
pub fn update_contract_descriptor() -> FunctionDescriptor {
    FunctionDescriptor::new(
        "updateContract",
        vec![
            ParamType::elementary("address"),
            ParamType::elementary("string"),
            ParamType::elementary("string"),
        ],
    )
}

/// Applies an update blob to the registry of the frame's account.
///
/// Owner-only. Emits one `FunctionUpdate` per route that actually changed,
/// then exactly one `CommitMessage`.
pub fn update_contract(
    frame: &mut Frame<'_>,
    delegate: Address,
    signatures: &str,
    message: String,
) -> Result<(), Revert> {
    ownable::only_owner(frame)?;
    let tokens = parse_signature_blob(signatures)?;

    let mut registry = load_registry(frame)?;
    let mut changed = 0usize;
    for token in tokens {
        if let Some(update) = registry.set_function(token.id, &token.signature, delegate) {
            debug!(
                id = %update.function_id,
                signature = %update.function_signature,
                old = ?update.old_delegate,
                new = ?update.new_delegate,
                "Function route updated"
            );
            frame.emit(&update)?;
            changed += 1;
        }
    }
    store_registry(frame, &registry)?;
    frame.emit(&CommitMessage {
        message: message.clone(),
    })?;

    info!(
        router = ?frame.address(),
        delegate = ?delegate,
        changed,
        total = registry.len(),
        message = %message,
        "Registry update committed"
    );
    Ok(())
}

/// The update delegate module.
#[derive(Clone, Copy, Debug, Default)]
pub struct UpdateDelegate;

impl UpdateDelegate {
    /// Catalog name.
    pub const NAME: &'static str = "ERC1538UpdateDelegate";
}

impl NativeModule for UpdateDelegate {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn functions(&self) -> Vec<FunctionDescriptor> {
        abi().into_iter().map(|(descriptor, _)| descriptor).collect()
    }

    fn construct(&self, frame: &mut Frame<'_>) -> Result<(), Revert> {
        let deployer = frame.caller();
        ownable::initialize(frame, deployer)?;
        ownable::renounce_ownership(frame)
    }

    fn execute(&self, frame: &mut Frame<'_>) -> Result<Bytes, Revert> {
        match DISPATCH.get(&frame.selector()) {
            Some(UpdateFunction::Ownership(call)) => call.handle(frame),
            Some(UpdateFunction::UpdateContract) => {
                let (delegate, signatures, message): (Address, String, String) =
                    decode_args(frame.calldata().as_slice())?;
                update_contract(frame, delegate, &signatures, message)?;
                Ok(Bytes::new())
            }
            None => Err(Revert::empty()),
        }
    }
}
