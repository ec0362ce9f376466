//! # Factory Client
//!
//! Typed calls to a deployed [`GenericFactory`](crate::factory::GenericFactory).

use fr_01_execution_host::codec::encode_call;
use fr_01_execution_host::domain::entities::Receipt;
use fr_01_execution_host::domain::value_objects::{Address, Bytes, Hash, U256};
use fr_01_execution_host::errors::ClientError;
use fr_01_execution_host::host::Host;

/// Client of one factory, sending as one account.
pub struct FactoryClient<'h> {
    host: &'h mut Host,
    factory: Address,
    sender: Address,
}

impl<'h> FactoryClient<'h> {
    /// Creates a client of the factory at `factory`.
    pub fn new(host: &'h mut Host, factory: Address, sender: Address) -> Self {
        Self {
            host,
            factory,
            sender,
        }
    }

    /// Factory address.
    #[must_use]
    pub fn factory(&self) -> Address {
        self.factory
    }

    /// Deploys `code` with `salt`.
    pub fn create_contract(&mut self, code: &Bytes, salt: Hash) -> Result<(Address, Receipt), ClientError> {
        self.create_contract_with_value(code, salt, U256::zero())
    }

    /// Deploys `code` with `salt`, endowing the instance with `value`.
    pub fn create_contract_with_value(
        &mut self,
        code: &Bytes,
        salt: Hash,
        value: U256,
    ) -> Result<(Address, Receipt), ClientError> {
        let data = encode_call("createContract(bytes,bytes32)", &(code, salt))?;
        let receipt = self
            .host
            .transact(self.sender, self.factory, value, data)
            .into_result()?;
        Ok((receipt.decode_output()?, receipt))
    }

    /// Deploys `code` and calls it with `call` in one transaction.
    pub fn create_contract_and_call(
        &mut self,
        code: &Bytes,
        salt: Hash,
        call: &Bytes,
    ) -> Result<(Address, Receipt), ClientError> {
        self.host.send_function(
            self.sender,
            self.factory,
            "createContractAndCall(bytes,bytes32,bytes)",
            &(code, salt, call),
        )
    }

    /// Address `createContract(code, salt)` would deploy to.
    pub fn predict_address(&mut self, code: &Bytes, salt: Hash) -> Result<Address, ClientError> {
        self.host.call_function(
            self.sender,
            self.factory,
            "predictAddress(bytes,bytes32)",
            &(code, salt),
        )
    }

    /// Address `createContractAndCall(code, salt, call)` would deploy to.
    pub fn predict_address_with_call(
        &mut self,
        code: &Bytes,
        salt: Hash,
        call: &Bytes,
    ) -> Result<Address, ClientError> {
        self.host.call_function(
            self.sender,
            self.factory,
            "predictAddressWithCall(bytes,bytes32,bytes)",
            &(code, salt, call),
        )
    }
}
