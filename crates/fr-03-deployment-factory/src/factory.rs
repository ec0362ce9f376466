//! # Generic Factory
//!
//! Deploys arbitrary init code at addresses known in advance.
//!
//! | Function | Salt fed to CREATE2 |
//! |----------|---------------------|
//! | `createContract(bytes,bytes32)` | `salt` |
//! | `createContractAndCall(bytes,bytes32,bytes)` | `keccak256(salt ++ call)` |
//! | `predictAddress(bytes,bytes32)` | `salt` |
//! | `predictAddressWithCall(bytes,bytes32,bytes)` | `keccak256(salt ++ call)` |
//!
//! A second deployment of the same code and salt fails on the host's
//! occupied-address rule. Deploy-and-call is one frame: if the call fails
//! the new instance is gone too.

use crate::domain::predictor::AddressPredictor;
use crate::errors::FactoryError;
use crate::events::NewContract;
use fr_01_execution_host::codec::{decode_args, encode_return, Revert};
use fr_01_execution_host::domain::abi::{FunctionDescriptor, ParamType};
use fr_01_execution_host::domain::value_objects::{Address, Bytes, Hash, Selector, U256};
use fr_01_execution_host::host::Frame;
use fr_01_execution_host::module::NativeModule;
use lazy_static::lazy_static;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug)]
enum FactoryFunction {
    CreateContract,
    CreateContractAndCall,
    PredictAddress,
    PredictAddressWithCall,
}

fn abi() -> Vec<(FunctionDescriptor, FactoryFunction)> {
    let code_and_salt = || vec![ParamType::elementary("bytes"), ParamType::elementary("bytes32")];
    let with_call = || {
        let mut inputs = code_and_salt();
        inputs.push(ParamType::elementary("bytes"));
        inputs
    };
    vec![
        (
            FunctionDescriptor::new("createContract", code_and_salt()),
            FactoryFunction::CreateContract,
        ),
        (
            FunctionDescriptor::new("createContractAndCall", with_call()),
            FactoryFunction::CreateContractAndCall,
        ),
        (
            FunctionDescriptor::new("predictAddress", code_and_salt()),
            FactoryFunction::PredictAddress,
        ),
        (
            FunctionDescriptor::new("predictAddressWithCall", with_call()),
            FactoryFunction::PredictAddressWithCall,
        ),
    ]
}

lazy_static! {
    static ref DISPATCH: HashMap<Selector, FactoryFunction> = abi()
        .into_iter()
        .map(|(descriptor, function)| (descriptor.selector(), function))
        .collect();
}

/// The factory module.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericFactory;

impl GenericFactory {
    /// Catalog name.
    pub const NAME: &'static str = "GenericFactory";
}

impl NativeModule for GenericFactory {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn functions(&self) -> Vec<FunctionDescriptor> {
        abi().into_iter().map(|(descriptor, _)| descriptor).collect()
    }

    fn execute(&self, frame: &mut Frame<'_>) -> Result<Bytes, Revert> {
        let Some(function) = DISPATCH.get(&frame.selector()).copied() else {
            return Err(Revert::empty());
        };
        let data = frame.calldata().clone();
        let factory = frame.address();

        let address = match function {
            FactoryFunction::CreateContract => {
                let (code, salt): (Bytes, Hash) = decode_args(data.as_slice())?;
                create_contract(frame, &code, salt)?
            }
            FactoryFunction::CreateContractAndCall => {
                let (code, salt, call): (Bytes, Hash, Bytes) = decode_args(data.as_slice())?;
                create_contract_and_call(frame, &code, salt, call)?
            }
            FactoryFunction::PredictAddress => {
                let (code, salt): (Bytes, Hash) = decode_args(data.as_slice())?;
                AddressPredictor::predict_code(factory, code.as_slice(), salt)
            }
            FactoryFunction::PredictAddressWithCall => {
                let (code, salt, call): (Bytes, Hash, Bytes) = decode_args(data.as_slice())?;
                AddressPredictor::predict_code_with_call(
                    factory,
                    code.as_slice(),
                    salt,
                    call.as_slice(),
                )
            }
        };
        Ok(encode_return(&address)?)
    }
}

/// Deploys `code` with `salt`, forwarding the frame's value to the instance.
pub fn create_contract(frame: &mut Frame<'_>, code: &Bytes, salt: Hash) -> Result<Address, FactoryError> {
    let value = frame.value();
    let address = frame.create2(value, code, salt)?;
    frame.emit(&NewContract { addr: address })?;
    info!(factory = ?frame.address(), address = %address, salt = %salt, "Contract created");
    Ok(address)
}

/// Deploys `code` with the call-bound salt, then calls the new instance.
pub fn create_contract_and_call(
    frame: &mut Frame<'_>,
    code: &Bytes,
    salt: Hash,
    call: Bytes,
) -> Result<Address, FactoryError> {
    let bound_salt = AddressPredictor::salt_with_call(salt, call.as_slice());
    let address = create_contract(frame, code, bound_salt)?;
    debug!(address = %address, call_len = call.len(), "Calling new contract");
    frame.call(address, U256::zero(), call)?;
    Ok(address)
}
