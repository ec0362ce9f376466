//! # Query Delegate
//!
//! Read-only views of the routing table, plus the ownership functions so that
//! a router can expose `owner()` and friends through a single delegate.

use super::ownable::{self, OwnershipCall};
use super::{dispatch_table, load_registry};
use fr_01_execution_host::codec::{decode_args, encode_return, Revert};
use fr_01_execution_host::domain::abi::{FunctionDescriptor, ParamType};
use fr_01_execution_host::domain::value_objects::{Address, Bytes, Selector, U256};
use fr_01_execution_host::host::Frame;
use fr_01_execution_host::module::NativeModule;
use lazy_static::lazy_static;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug)]
enum QueryFunction {
    DelegateAddress,
    DelegateAddresses,
    DelegateFunctionSignatures,
    FunctionById,
    FunctionByIndex,
    FunctionExists,
    FunctionSignatures,
    TotalFunctions,
}

#[derive(Clone, Copy, Debug)]
enum Entry {
    Query(QueryFunction),
    Ownership(OwnershipCall),
}

fn function(name: &str, inputs: &[&str]) -> FunctionDescriptor {
    FunctionDescriptor::new(name, inputs.iter().map(|t| ParamType::elementary(*t)).collect())
}

fn abi() -> Vec<(FunctionDescriptor, Entry)> {
    use QueryFunction as Q;
    vec![
        (function("delegateAddress", &["string"]), Entry::Query(Q::DelegateAddress)),
        (function("delegateAddresses", &[]), Entry::Query(Q::DelegateAddresses)),
        (
            function("delegateFunctionSignatures", &["address"]),
            Entry::Query(Q::DelegateFunctionSignatures),
        ),
        (function("functionById", &["bytes4"]), Entry::Query(Q::FunctionById)),
        (function("functionByIndex", &["uint256"]), Entry::Query(Q::FunctionByIndex)),
        (function("functionExists", &["string"]), Entry::Query(Q::FunctionExists)),
        (function("functionSignatures", &[]), Entry::Query(Q::FunctionSignatures)),
        (
            OwnershipCall::Owner.descriptor(),
            Entry::Ownership(OwnershipCall::Owner),
        ),
        (
            OwnershipCall::RenounceOwnership.descriptor(),
            Entry::Ownership(OwnershipCall::RenounceOwnership),
        ),
        (function("totalFunctions", &[]), Entry::Query(Q::TotalFunctions)),
        (
            OwnershipCall::TransferOwnership.descriptor(),
            Entry::Ownership(OwnershipCall::TransferOwnership),
        ),
    ]
}

lazy_static! {
    static ref DISPATCH: HashMap<Selector, Entry> = dispatch_table(&abi());
}

/// The query delegate module.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryDelegate;

impl QueryDelegate {
    /// Catalog name.
    pub const NAME: &'static str = "ERC1538QueryDelegate";
}

impl NativeModule for QueryDelegate {
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
            Some(Entry::Ownership(call)) => call.handle(frame),
            Some(Entry::Query(function)) => query(frame, *function),
            None => Err(Revert::empty()),
        }
    }
}

fn query(frame: &Frame<'_>, function: QueryFunction) -> Result<Bytes, Revert> {
    let data = frame.calldata().as_slice();
    let registry = load_registry(frame)?;
    let output = match function {
        QueryFunction::TotalFunctions => encode_return(&U256::from(registry.len()))?,
        QueryFunction::FunctionByIndex => {
            let (index,): (U256,) = decode_args(data)?;
            encode_return(registry.entry_at(index)?)?
        }
        QueryFunction::FunctionById => {
            let (id,): (Selector,) = decode_args(data)?;
            encode_return(&registry.entry_by_id(id))?
        }
        QueryFunction::FunctionExists => {
            let (signature,): (String,) = decode_args(data)?;
            encode_return(&registry.contains_signature(&signature))?
        }
        QueryFunction::FunctionSignatures => encode_return(&registry.signatures())?,
        QueryFunction::DelegateFunctionSignatures => {
            let (delegate,): (Address,) = decode_args(data)?;
            encode_return(&registry.delegate_signatures(delegate))?
        }
        QueryFunction::DelegateAddress => {
            let (signature,): (String,) = decode_args(data)?;
            encode_return(&registry.delegate_of_signature(&signature))?
        }
        QueryFunction::DelegateAddresses => encode_return(&registry.delegates())?,
    };
    Ok(output)
}
