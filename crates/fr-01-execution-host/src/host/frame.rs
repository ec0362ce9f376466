//! # Frame
//!
//! The view a module gets of the host while one of its functions runs.

use crate::codec::{decode_return, encode_call, Revert};
use crate::domain::entities::ExecutionContext;
use crate::domain::value_objects::{Address, Bytes, Hash, Selector, StorageKey, U256};
use crate::errors::{CodecError, VmError};
use crate::events::Event;
use crate::host::Host;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

/// A running call frame.
pub struct Frame<'h> {
    host: &'h mut Host,
    ctx: ExecutionContext,
}

impl<'h> Frame<'h> {
    pub(crate) fn new(host: &'h mut Host, ctx: ExecutionContext) -> Self {
        Self { host, ctx }
    }

    // =========================================================================
    // CONTEXT
    // =========================================================================

    /// The full execution context.
    #[must_use]
    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    /// Immediate caller. Preserved across DELEGATECALL.
    #[must_use]
    pub fn caller(&self) -> Address {
        self.ctx.caller
    }

    /// Transaction sender.
    #[must_use]
    pub fn origin(&self) -> Address {
        self.ctx.origin
    }

    /// Account whose storage this frame acts on.
    #[must_use]
    pub fn address(&self) -> Address {
        self.ctx.address
    }

    /// Value sent with the call.
    #[must_use]
    pub fn value(&self) -> U256 {
        self.ctx.value
    }

    /// Calldata (constructor arguments in a constructor frame).
    #[must_use]
    pub fn calldata(&self) -> &Bytes {
        &self.ctx.data
    }

    /// Leading 4 bytes of the calldata, zero-padded.
    #[must_use]
    pub fn selector(&self) -> Selector {
        Selector::from_calldata(self.ctx.data.as_slice())
    }

    /// Returns true inside STATICCALL.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.ctx.is_static
    }

    /// Current call depth.
    #[must_use]
    pub fn depth(&self) -> u16 {
        self.ctx.depth
    }

    /// Size of the code held by an account.
    #[must_use]
    pub fn code_size(&self, address: Address) -> usize {
        self.host.state.code(&address).len()
    }

    /// Balance of an account.
    #[must_use]
    pub fn balance(&self, address: Address) -> U256 {
        self.host.state.balance(&address)
    }

    fn ensure_writable(&self) -> Result<(), VmError> {
        if self.ctx.is_static {
            return Err(VmError::WriteInStaticContext);
        }
        Ok(())
    }

    // =========================================================================
    // STORAGE AND LOGS
    // =========================================================================

    /// Reads a typed value from this frame's storage, `T::default()` if unset.
    pub fn sload<T: DeserializeOwned + Default>(&self, key: StorageKey) -> Result<T, VmError> {
        match self.host.state.storage(&self.ctx.address, &key) {
            Some(raw) => bincode::deserialize(raw.as_slice())
                .map_err(|e| VmError::Codec(CodecError::Decode(e.to_string()))),
            None => Ok(T::default()),
        }
    }

    /// Writes a typed value to this frame's storage.
    pub fn sstore<T: Serialize>(&mut self, key: StorageKey, value: &T) -> Result<(), VmError> {
        self.ensure_writable()?;
        let raw = bincode::serialize(value)
            .map_err(|e| VmError::Codec(CodecError::Encode(e.to_string())))?;
        self.host
            .state
            .set_storage(self.ctx.address, key, Bytes::from_vec(raw));
        Ok(())
    }

    /// Emits an event from this frame's account.
    pub fn emit<E: Event>(&mut self, event: &E) -> Result<(), VmError> {
        self.ensure_writable()?;
        let log = event.to_log(self.ctx.address)?;
        trace!(emitter = ?self.ctx.address, event = E::SIGNATURE, "Log emitted");
        self.host.state.push_log(log);
        Ok(())
    }

    // =========================================================================
    // CALLS
    // =========================================================================

    /// CALL: runs `to`'s code in `to`'s context, optionally sending value.
    pub fn call(&mut self, to: Address, value: U256, data: Bytes) -> Result<Bytes, VmError> {
        if !value.is_zero() {
            self.ensure_writable()?;
        }
        let child = self.ctx.child_call(to, value, data);
        self.host.run_frame(child, true)
    }

    /// DELEGATECALL: runs `code_address`'s code in this frame's context.
    pub fn delegate_call(&mut self, code_address: Address, data: Bytes) -> Result<Bytes, VmError> {
        let child = self.ctx.child_delegatecall(code_address, data);
        self.host.run_frame(child, false)
    }

    /// STATICCALL: like CALL without value, any write in the callee fails.
    pub fn static_call(&mut self, to: Address, data: Bytes) -> Result<Bytes, VmError> {
        let child = self.ctx.child_staticcall(to, data);
        self.host.run_frame(child, false)
    }

    /// Typed CALL of `signature` on `to`.
    pub fn call_function<A, R>(&mut self, to: Address, signature: &str, args: &A) -> Result<R, Revert>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let data = encode_call(signature, args)?;
        let output = self.call(to, U256::zero(), data)?;
        Ok(decode_return(output.as_slice())?)
    }

    /// CREATE2: deploys `init_code` at the address derived from this
    /// account, `salt` and `keccak256(init_code)`.
    pub fn create2(&mut self, value: U256, init_code: &Bytes, salt: Hash) -> Result<Address, VmError> {
        self.ensure_writable()?;
        self.host
            .create2(&self.ctx, value, init_code, salt)
    }
}
