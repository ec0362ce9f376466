//! # Error Types
//!
//! Failures of registry updates, queries, ownership and dispatch.
//! Every variant aborts the enclosing frame; none is retried.

use fr_01_execution_host::codec::Revert;
use fr_01_execution_host::domain::value_objects::{Address, Selector, U256};
use fr_01_execution_host::errors::CodecError;
use thiserror::Error;

/// Registry errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A non-owner attempted a gated mutation.
    #[error("caller {caller} is not the owner")]
    Unauthorized { caller: Address },

    /// Ordinal lookup past the end of the sequence.
    #[error("function index {index} out of range ({len} functions)")]
    IndexOutOfRange { index: U256, len: usize },

    /// A token of an update blob is not a valid signature.
    #[error("malformed signature `{token}`: {reason}")]
    MalformedSignature { token: String, reason: String },

    /// Ownership cannot be transferred to the zero address.
    #[error("new owner is the zero address")]
    NewOwnerIsZero,

    /// No delegate for the identifier and no fallback delegate.
    #[error("no delegate registered for {0} and no fallback")]
    NoRoute(Selector),

    /// Calldata or storage could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<RegistryError> for Revert {
    fn from(err: RegistryError) -> Self {
        Revert::with_reason(err.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
