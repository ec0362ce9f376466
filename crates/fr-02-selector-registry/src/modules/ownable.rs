//! # Access Control
//!
//! Single-owner gate over the frame's account. The owner lives in
//! [`OWNER_SLOT`] of whichever account executes, so a proxy and each of its
//! delegates keep independent records.

use super::OWNER_SLOT;
use crate::errors::RegistryError;
use crate::events::OwnershipTransferred;
use fr_01_execution_host::codec::{decode_args, encode_return, Revert};
use fr_01_execution_host::domain::abi::{FunctionDescriptor, ParamType};
use fr_01_execution_host::domain::value_objects::{Address, Bytes};
use fr_01_execution_host::host::Frame;
use tracing::{info, warn};

/// The ownership functions shared by both delegates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnershipCall {
    /// `owner()`
    Owner,
    /// `renounceOwnership()`
    RenounceOwnership,
    /// `transferOwnership(address)`
    TransferOwnership,
}

impl OwnershipCall {
    /// ABI entry of the call.
    #[must_use]
    pub fn descriptor(self) -> FunctionDescriptor {
        match self {
            Self::Owner => FunctionDescriptor::new("owner", vec![]),
            Self::RenounceOwnership => FunctionDescriptor::new("renounceOwnership", vec![]),
            Self::TransferOwnership => {
                FunctionDescriptor::new("transferOwnership", vec![ParamType::elementary("address")])
            }
        }
    }

    /// Runs the call against the frame's account.
    pub fn handle(self, frame: &mut Frame<'_>) -> Result<Bytes, Revert> {
        match self {
            Self::Owner => Ok(encode_return(&owner(frame)?)?),
            Self::RenounceOwnership => {
                renounce_ownership(frame)?;
                Ok(Bytes::new())
            }
            Self::TransferOwnership => {
                let (new_owner,): (Address,) = decode_args(frame.calldata().as_slice())?;
                transfer_ownership(frame, new_owner)?;
                Ok(Bytes::new())
            }
        }
    }
}

/// Current owner, zero when renounced or never set.
pub fn owner(frame: &Frame<'_>) -> Result<Address, Revert> {
    Ok(frame.sload(*OWNER_SLOT)?)
}

/// Sets the first owner. Emits `OwnershipTransferred(zero, owner)`.
pub fn initialize(frame: &mut Frame<'_>, owner: Address) -> Result<(), Revert> {
    set_owner(frame, owner)
}

/// Fails unless the frame's caller is the owner. A renounced account has no
/// owner, not even the zero address.
pub fn only_owner(frame: &Frame<'_>) -> Result<(), Revert> {
    let caller = frame.caller();
    let owner = owner(frame)?;
    if owner.is_zero() || owner != caller {
        warn!(caller = ?caller, account = ?frame.address(), "Unauthorized owner-only call");
        return Err(RegistryError::Unauthorized { caller }.into());
    }
    Ok(())
}

/// Hands ownership to a non-zero address.
pub fn transfer_ownership(frame: &mut Frame<'_>, new_owner: Address) -> Result<(), Revert> {
    only_owner(frame)?;
    if new_owner.is_zero() {
        return Err(RegistryError::NewOwnerIsZero.into());
    }
    set_owner(frame, new_owner)
}

/// Gives up ownership for good.
pub fn renounce_ownership(frame: &mut Frame<'_>) -> Result<(), Revert> {
    only_owner(frame)?;
    set_owner(frame, Address::ZERO)
}

fn set_owner(frame: &mut Frame<'_>, new_owner: Address) -> Result<(), Revert> {
    let previous_owner = owner(frame)?;
    frame.sstore(*OWNER_SLOT, &new_owner)?;
    frame.emit(&OwnershipTransferred {
        previous_owner,
        new_owner,
    })?;
    info!(account = ?frame.address(), previous = ?previous_owner, owner = ?new_owner, "Ownership transferred");
    Ok(())
}
