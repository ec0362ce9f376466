//! # Execution Host
//!
//! Runs native modules against a journaled world state.
//!
//! ## Frame rules
//!
//! - Every frame runs under its own checkpoint. A failing frame is rolled
//!   back before its failure reaches the parent, so no partial state or log
//!   survives a failure.
//! - A value-bearing CALL moves balance before the callee runs.
//! - Calling an account without code succeeds with empty output.
//! - Depth is bounded by [`VmConfig::max_call_depth`].
//!
//! ## Creation rules
//!
//! - CREATE: address = `keccak256(rlp([sender, nonce]))[12:]`.
//! - CREATE2: address = `keccak256(0xff ++ creator ++ salt ++ keccak256(init_code))[12:]`.
//! - A target holding code or a non-zero nonce is occupied.
//! - The creator's nonce is incremented and the new account starts at nonce 1.

mod frame;
pub mod state;

pub use frame::Frame;
pub use state::{Checkpoint, JournalEntry, WorldState};

use crate::codec::{decode_return, encode_call, Revert};
use crate::domain::entities::{Account, ExecutionContext, Receipt, Transaction, VmConfig};
use crate::domain::services::{compute_contract_address, compute_create2_address, keccak256};
use crate::domain::value_objects::{Address, Bytes, Hash, U256};
use crate::errors::{ClientError, VmError};
use crate::module::{runtime_code, ModuleCatalog, NativeModule};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The execution host.
#[derive(Debug)]
pub struct Host {
    config: VmConfig,
    catalog: Arc<ModuleCatalog>,
    pub(crate) state: WorldState,
}

impl Default for Host {
    fn default() -> Self {
        Self::new(VmConfig::default(), ModuleCatalog::new())
    }
}

impl Host {
    /// Creates a host with the given limits and modules.
    #[must_use]
    pub fn new(config: VmConfig, catalog: ModuleCatalog) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog),
            state: WorldState::new(),
        }
    }

    /// Host limits.
    #[must_use]
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Registered modules.
    #[must_use]
    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Registers an additional module.
    pub fn register_module<M: NativeModule + 'static>(&mut self, module: M) {
        Arc::make_mut(&mut self.catalog).register(module);
    }

    // =========================================================================
    // STATE QUERIES
    // =========================================================================

    /// Credits `amount` outside of any transaction.
    pub fn fund(&mut self, address: Address, amount: U256) {
        let balance = self.state.balance(&address).saturating_add(amount);
        self.state.set_balance(address, balance);
        self.state.commit();
    }

    /// Returns the account, if it exists.
    #[must_use]
    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.state.account(address)
    }

    /// Balance of an account.
    #[must_use]
    pub fn balance(&self, address: &Address) -> U256 {
        self.state.balance(address)
    }

    /// Nonce of an account.
    #[must_use]
    pub fn nonce(&self, address: &Address) -> u64 {
        self.state.nonce(address)
    }

    /// Runtime code of an account.
    #[must_use]
    pub fn code(&self, address: &Address) -> Bytes {
        self.state.code(address)
    }

    // =========================================================================
    // TRANSACTIONS
    // =========================================================================

    /// Executes a transaction to completion and commits its effects.
    ///
    /// The sender's nonce is incremented even when execution fails.
    pub fn execute(&mut self, tx: Transaction) -> Receipt {
        let nonce = self.state.nonce(&tx.from);
        self.state.increment_nonce(tx.from);
        self.state.commit();

        let result = match tx.to {
            Some(to) => {
                let ctx = ExecutionContext::new_transaction(tx.from, to, tx.value, tx.data);
                self.run_frame(ctx, true).map(|output| (output, None))
            }
            None => {
                let address = compute_contract_address(tx.from, nonce);
                self.create_contract(tx.from, tx.from, address, tx.value, &tx.data, 0)
                    .map(|address| (Bytes::new(), Some(address)))
            }
        };

        let logs = self.state.commit();
        match result {
            Ok((output, contract_address)) => {
                if let Some(address) = contract_address {
                    info!(deployer = ?tx.from, contract = ?address, "Contract deployed");
                }
                Receipt::success(output, logs, contract_address)
            }
            Err(err) => {
                warn!(sender = ?tx.from, to = ?tx.to, error = %err, "Transaction failed");
                Receipt::failure(err.into())
            }
        }
    }

    /// Deploys init code in a creation transaction.
    pub fn deploy(&mut self, from: Address, init_code: Bytes, value: U256) -> Receipt {
        self.execute(Transaction::create(from, value, init_code))
    }

    /// Sends a call transaction.
    pub fn transact(&mut self, from: Address, to: Address, value: U256, data: Bytes) -> Receipt {
        self.execute(Transaction::call(from, to, value, data))
    }

    /// Read-only static call. State and logs are always discarded.
    pub fn call(&mut self, from: Address, to: Address, data: Bytes) -> Result<Bytes, Revert> {
        let checkpoint = self.state.checkpoint();
        let ctx = ExecutionContext {
            is_static: true,
            ..ExecutionContext::new_transaction(from, to, U256::zero(), data)
        };
        let result = self.run_frame(ctx, false);
        self.state.revert_to(checkpoint);
        self.state.commit();
        result.map_err(Revert::from)
    }

    /// Sends a transaction calling `signature` and decodes its return value.
    pub fn send_function<A, R>(
        &mut self,
        from: Address,
        to: Address,
        signature: &str,
        args: &A,
    ) -> Result<(R, Receipt), ClientError>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let data = encode_call(signature, args)?;
        let receipt = self.transact(from, to, U256::zero(), data).into_result()?;
        let value = receipt.decode_output()?;
        Ok((value, receipt))
    }

    /// Static call of `signature`, decoding its return value.
    pub fn call_function<A, R>(
        &mut self,
        from: Address,
        to: Address,
        signature: &str,
        args: &A,
    ) -> Result<R, ClientError>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let data = encode_call(signature, args)?;
        let output = self.call(from, to, data)?;
        Ok(decode_return(output.as_slice())?)
    }

    // =========================================================================
    // FRAMES
    // =========================================================================

    /// Runs a frame under its own checkpoint.
    pub(crate) fn run_frame(&mut self, ctx: ExecutionContext, transfer: bool) -> Result<Bytes, VmError> {
        if ctx.depth > self.config.max_call_depth {
            return Err(VmError::CallDepthExceeded {
                depth: ctx.depth,
                max: self.config.max_call_depth,
            });
        }

        let checkpoint = self.state.checkpoint();
        let result = self.run_frame_unchecked(ctx, transfer);
        if result.is_err() {
            self.state.revert_to(checkpoint);
        }
        result
    }

    fn run_frame_unchecked(&mut self, ctx: ExecutionContext, transfer: bool) -> Result<Bytes, VmError> {
        if transfer {
            self.state.transfer(ctx.caller, ctx.address, ctx.value)?;
        }

        let code = self.state.code(&ctx.code_address);
        if code.is_empty() {
            return Ok(Bytes::new());
        }
        let module = self.catalog.resolve_runtime(code.as_slice())?;

        debug!(
            module = module.name(),
            address = ?ctx.address,
            code_address = ?ctx.code_address,
            depth = ctx.depth,
            is_static = ctx.is_static,
            "Entering frame"
        );
        let mut frame = Frame::new(self, ctx);
        module.execute(&mut frame).map_err(VmError::Revert)
    }

    /// CREATE2 from a running frame.
    pub(crate) fn create2(
        &mut self,
        parent: &ExecutionContext,
        value: U256,
        init_code: &Bytes,
        salt: Hash,
    ) -> Result<Address, VmError> {
        let creator = parent.address;
        let address = compute_create2_address(creator, salt, keccak256(init_code.as_slice()));

        let checkpoint = self.state.checkpoint();
        let result = self
            .ensure_vacant(address)
            .and_then(|()| {
                self.state.increment_nonce(creator);
                self.create_contract(
                    parent.origin,
                    creator,
                    address,
                    value,
                    init_code,
                    parent.depth.saturating_add(1),
                )
            });
        if result.is_err() {
            self.state.revert_to(checkpoint);
        }
        result
    }

    fn ensure_vacant(&self, address: Address) -> Result<(), VmError> {
        match self.state.account(&address) {
            Some(account) if account.blocks_deployment() => {
                Err(VmError::ContractAlreadyExists(address))
            }
            _ => Ok(()),
        }
    }

    /// Runs a module constructor at `address` and installs its runtime code.
    fn create_contract(
        &mut self,
        origin: Address,
        creator: Address,
        address: Address,
        value: U256,
        init_code: &Bytes,
        depth: u16,
    ) -> Result<Address, VmError> {
        if init_code.len() > self.config.max_init_code_size {
            return Err(VmError::InitCodeSizeExceeded {
                size: init_code.len(),
                max: self.config.max_init_code_size,
            });
        }
        if depth > self.config.max_call_depth {
            return Err(VmError::CallDepthExceeded {
                depth,
                max: self.config.max_call_depth,
            });
        }
        self.ensure_vacant(address)?;

        let checkpoint = self.state.checkpoint();
        let result = self.create_contract_unchecked(origin, creator, address, value, init_code, depth);
        if result.is_err() {
            self.state.revert_to(checkpoint);
        }
        result
    }

    fn create_contract_unchecked(
        &mut self,
        origin: Address,
        creator: Address,
        address: Address,
        value: U256,
        init_code: &Bytes,
        depth: u16,
    ) -> Result<Address, VmError> {
        let (module, constructor_args) = self.catalog.resolve_init(init_code.as_slice())?;

        self.state.set_nonce(address, 1);
        self.state.transfer(creator, address, value)?;

        let ctx = ExecutionContext {
            origin,
            caller: creator,
            address,
            code_address: address,
            value,
            data: constructor_args,
            depth,
            is_static: false,
        };
        debug!(module = module.name(), address = ?address, creator = ?creator, "Running constructor");
        {
            let mut frame = Frame::new(self, ctx);
            module.construct(&mut frame)?;
        }

        let code = runtime_code(module.name());
        if code.len() > self.config.max_code_size {
            return Err(VmError::CodeSizeExceeded {
                size: code.len(),
                max: self.config.max_code_size,
            });
        }
        self.state.set_code(address, code);
        Ok(address)
    }
}

// =============================================================================
// TESTS
// =============================================================================
