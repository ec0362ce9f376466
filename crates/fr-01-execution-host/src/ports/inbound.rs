//! # Driving Ports (API - Inbound)
//!
//! The interface exposed to submitters of transactions. Implementations
//! must apply submissions one at a time in a single total order.

use crate::codec::Revert;
use crate::domain::entities::{Receipt, Transaction};
use crate::domain::value_objects::{Address, Bytes, U256};
use async_trait::async_trait;

/// Primary API for transaction execution.
///
/// ## Usage
///
/// ```ignore
/// let receipt = api.deploy(deployer, init_code, U256::zero()).await;
/// let proxy = receipt.contract_address.unwrap();
/// let output = api.call(user, proxy, calldata).await?;
/// ```
#[async_trait]
pub trait ExecutionApi: Send + Sync {
    /// Executes a transaction and commits its effects.
    async fn execute(&self, tx: Transaction) -> Receipt;

    /// Deploys init code in a creation transaction.
    async fn deploy(&self, from: Address, init_code: Bytes, value: U256) -> Receipt {
        self.execute(Transaction::create(from, value, init_code)).await
    }

    /// Sends a call transaction.
    async fn transact(&self, from: Address, to: Address, value: U256, data: Bytes) -> Receipt {
        self.execute(Transaction::call(from, to, value, data)).await
    }

    /// Read-only call whose effects are discarded.
    async fn call(&self, from: Address, to: Address, data: Bytes) -> Result<Bytes, Revert>;
}
