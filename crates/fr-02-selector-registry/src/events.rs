//! # Event Schema
//!
//! Events emitted by the proxy and its delegates. Since delegates run
//! through DELEGATECALL, every one of these is logged by the proxy account.

use fr_01_execution_host::domain::value_objects::{Address, Selector};
use fr_01_execution_host::events::Event;
use serde::{Deserialize, Serialize};

/// A routing entry was added, replaced or removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionUpdate {
    /// Identifier whose route changed.
    pub function_id: Selector,
    /// Previous delegate (zero when added).
    pub old_delegate: Address,
    /// New delegate (zero when removed).
    pub new_delegate: Address,
    /// Signature token as given in the update blob.
    pub function_signature: String,
}

impl Event for FunctionUpdate {
    const SIGNATURE: &'static str = "FunctionUpdate(bytes4,address,address,string)";
}

/// Closing event of every `updateContract` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    /// Free-form message supplied by the owner.
    pub message: String,
}

impl Event for CommitMessage {
    const SIGNATURE: &'static str = "CommitMessage(string)";
}

/// Ownership changed hands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferred {
    /// Previous owner (zero at initialization).
    pub previous_owner: Address,
    /// New owner (zero on renounce).
    pub new_owner: Address,
}

impl Event for OwnershipTransferred {
    const SIGNATURE: &'static str = "OwnershipTransferred(address,address)";
}
