//! # Core Domain Entities
//!
//! Main entities of the execution host: frames' contexts, accounts,
//! transactions, receipts and the host limits.

use crate::codec::{decode_return, Revert};
use crate::domain::value_objects::{Address, Bytes, Hash, StorageKey, U256};
use crate::errors::CodecError;
use crate::events::Event;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// EXECUTION CONTEXT
// =============================================================================

/// Execution context of a single frame.
///
/// `address` is the account whose storage, balance and logs the frame acts
/// on; `code_address` is the account whose code runs. They differ only under
/// DELEGATECALL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Transaction sender (EOA that initiated the transaction).
    pub origin: Address,
    /// Immediate caller of this frame.
    pub caller: Address,
    /// Storage context.
    pub address: Address,
    /// Account whose code is executed.
    pub code_address: Address,
    /// Value sent with the call.
    pub value: U256,
    /// Calldata, or constructor arguments in a constructor frame.
    pub data: Bytes,
    /// Call depth (0 for the transaction frame).
    pub depth: u16,
    /// Is this a static call (no state changes allowed).
    pub is_static: bool,
}

impl ExecutionContext {
    /// Creates the context of a top-level transaction frame.
    #[must_use]
    pub fn new_transaction(origin: Address, to: Address, value: U256, data: Bytes) -> Self {
        Self {
            origin,
            caller: origin,
            address: to,
            code_address: to,
            value,
            data,
            depth: 0,
            is_static: false,
        }
    }

    /// Creates a child context for a nested CALL.
    #[must_use]
    pub fn child_call(&self, address: Address, value: U256, data: Bytes) -> Self {
        Self {
            origin: self.origin,
            caller: self.address,
            address,
            code_address: address,
            value,
            data,
            depth: self.depth.saturating_add(1),
            is_static: self.is_static,
        }
    }

    /// Creates a child context for DELEGATECALL.
    ///
    /// Caller, value and storage address are inherited; only the code changes.
    #[must_use]
    pub fn child_delegatecall(&self, code_address: Address, data: Bytes) -> Self {
        Self {
            origin: self.origin,
            caller: self.caller,
            address: self.address,
            code_address,
            value: self.value,
            data,
            depth: self.depth.saturating_add(1),
            is_static: self.is_static,
        }
    }

    /// Creates a child context for STATICCALL.
    #[must_use]
    pub fn child_staticcall(&self, address: Address, data: Bytes) -> Self {
        Self {
            origin: self.origin,
            caller: self.address,
            address,
            code_address: address,
            value: U256::zero(),
            data,
            depth: self.depth.saturating_add(1),
            is_static: true,
        }
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new_transaction(Address::ZERO, Address::ZERO, U256::zero(), Bytes::new())
    }
}

// =============================================================================
// ACCOUNT
// =============================================================================

/// An account in the world state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Account {
    /// Account balance.
    pub balance: U256,
    /// Account nonce.
    pub nonce: u64,
    /// Runtime code image, empty for plain accounts.
    pub code: Bytes,
    /// Storage slots holding bincode-encoded values.
    pub storage: HashMap<StorageKey, Bytes>,
}

impl Account {
    /// Returns true if this account holds code.
    #[must_use]
    pub fn is_contract(&self) -> bool {
        !self.code.is_empty()
    }

    /// Returns true if a CREATE/CREATE2 may not target this account.
    #[must_use]
    pub fn blocks_deployment(&self) -> bool {
        self.is_contract() || self.nonce > 0
    }
}

// =============================================================================
// LOG (EVENT)
// =============================================================================

/// Emitted log (event) from contract execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    /// Account that emitted the log (the storage context of the frame).
    pub address: Address,
    /// Indexed topics; the first is the event signature hash.
    pub topics: Vec<Hash>,
    /// Bincode-encoded event body.
    pub data: Bytes,
}

impl Log {
    /// Creates a new log.
    #[must_use]
    pub fn new(address: Address, topics: Vec<Hash>, data: Bytes) -> Self {
        Self {
            address,
            topics,
            data,
        }
    }
}

// =============================================================================
// TRANSACTION
// =============================================================================

/// A top-level transaction submitted to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Sender address.
    pub from: Address,
    /// Recipient address (None for contract creation).
    pub to: Option<Address>,
    /// Value transferred.
    pub value: U256,
    /// Calldata, or init code for contract creation.
    pub data: Bytes,
}

impl Transaction {
    /// A call transaction.
    #[must_use]
    pub fn call(from: Address, to: Address, value: U256, data: Bytes) -> Self {
        Self {
            from,
            to: Some(to),
            value,
            data,
        }
    }

    /// A contract creation transaction.
    #[must_use]
    pub fn create(from: Address, value: U256, init_code: Bytes) -> Self {
        Self {
            from,
            to: None,
            value,
            data: init_code,
        }
    }

    /// Returns true if this is a contract creation transaction.
    #[must_use]
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }
}

// =============================================================================
// RECEIPT
// =============================================================================

/// Outcome of a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Receipt {
    /// Whether execution succeeded.
    pub success: bool,
    /// Return data of the top-level frame.
    pub output: Bytes,
    /// Logs in emission order; empty on failure.
    pub logs: Vec<Log>,
    /// Address of the created contract, for creation transactions.
    pub contract_address: Option<Address>,
    /// Failure payload, when `success` is false.
    pub revert: Option<Revert>,
}

impl Receipt {
    /// Creates a successful receipt.
    #[must_use]
    pub fn success(output: Bytes, logs: Vec<Log>, contract_address: Option<Address>) -> Self {
        Self {
            success: true,
            output,
            logs,
            contract_address,
            revert: None,
        }
    }

    /// Creates a failed receipt.
    #[must_use]
    pub fn failure(revert: Revert) -> Self {
        Self {
            success: false,
            output: Bytes::new(),
            logs: Vec::new(),
            contract_address: None,
            revert: Some(revert),
        }
    }

    /// Revert reason, if the transaction failed with one.
    #[must_use]
    pub fn revert_reason(&self) -> Option<String> {
        self.revert.as_ref().and_then(Revert::reason)
    }

    /// Events of type `E` emitted by `emitter`, in emission order.
    #[must_use]
    pub fn events<E: Event>(&self, emitter: Address) -> Vec<E> {
        self.logs
            .iter()
            .filter(|log| log.address == emitter)
            .filter_map(E::from_log)
            .collect()
    }

    /// Decodes the return data.
    pub fn decode_output<R: DeserializeOwned>(&self) -> Result<R, CodecError> {
        decode_return(self.output.as_slice())
    }

    /// Converts a failed receipt into its revert payload.
    pub fn into_result(self) -> Result<Self, Revert> {
        match self.revert {
            Some(revert) if !self.success => Err(revert),
            _ => Ok(self),
        }
    }
}

// =============================================================================
// VM CONFIGURATION
// =============================================================================

/// Execution limits of the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VmConfig {
    /// Maximum call depth (default: 1024).
    pub max_call_depth: u16,
    /// Maximum runtime code size in bytes (EIP-170: 24KB).
    pub max_code_size: usize,
    /// Maximum init code size in bytes (EIP-3860: 48KB).
    pub max_init_code_size: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 1024,
            max_code_size: 24_576,      // 24 KB (EIP-170)
            max_init_code_size: 49_152, // 48 KB (EIP-3860)
        }
    }
}

impl VmConfig {
    /// Loads limits from the environment, falling back to defaults.
    ///
    /// Reads `FR_MAX_CALL_DEPTH`, `FR_MAX_CODE_SIZE` and
    /// `FR_MAX_INIT_CODE_SIZE`; unparseable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_call_depth: env_or("FR_MAX_CALL_DEPTH", defaults.max_call_depth),
            max_code_size: env_or("FR_MAX_CODE_SIZE", defaults.max_code_size),
            max_init_code_size: env_or("FR_MAX_INIT_CODE_SIZE", defaults.max_init_code_size),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// =============================================================================
// TESTS
// =============================================================================
