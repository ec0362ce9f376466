//! # Error Types
//!
//! All error types for the execution host.

use crate::codec::Revert;
use crate::domain::value_objects::{Address, U256};
use thiserror::Error;

// =============================================================================
// VM ERRORS
// =============================================================================

/// Errors raised by the host while executing a frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VmError {
    /// Call depth exceeded maximum.
    #[error("call depth exceeded: {depth} > {max}")]
    CallDepthExceeded { depth: u16, max: u16 },

    /// Runtime code size exceeded limit (EIP-170).
    #[error("code size exceeded: {size} > {max} bytes")]
    CodeSizeExceeded { size: usize, max: usize },

    /// Init code size exceeded limit (EIP-3860).
    #[error("init code size exceeded: {size} > {max} bytes")]
    InitCodeSizeExceeded { size: usize, max: usize },

    /// Attempted to modify state in static context.
    #[error("write operation in static context")]
    WriteInStaticContext,

    /// Insufficient balance for transfer.
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: U256, available: U256 },

    /// Target of a CREATE/CREATE2 already holds code or a non-zero nonce.
    #[error("contract already exists at address: {0}")]
    ContractAlreadyExists(Address),

    /// Code image could not be decoded.
    #[error("invalid code: {0}")]
    InvalidCode(String),

    /// Code names a module the catalog does not know.
    #[error("unknown module: {0}")]
    UnknownModule(String),

    /// Storage or calldata (de)serialization failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Execution reverted.
    #[error("revert: {0}")]
    Revert(Revert),
}

impl From<Revert> for VmError {
    fn from(revert: Revert) -> Self {
        Self::Revert(revert)
    }
}

impl From<VmError> for Revert {
    fn from(err: VmError) -> Self {
        match err {
            VmError::Revert(revert) => revert,
            other => Revert::with_reason(other.to_string()),
        }
    }
}

// =============================================================================
// CODEC ERRORS
// =============================================================================

/// Errors from the calling convention codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Calldata shorter than a selector.
    #[error("calldata too short: {len} bytes, selector needs 4")]
    MissingSelector { len: usize },

    /// Arguments or return data could not be decoded.
    #[error("decoding failed: {0}")]
    Decode(String),

    /// A value could not be encoded.
    #[error("encoding failed: {0}")]
    Encode(String),
}

impl From<CodecError> for Revert {
    fn from(err: CodecError) -> Self {
        Revert::with_reason(err.to_string())
    }
}

// =============================================================================
// ABI ERRORS
// =============================================================================

/// Errors from signature canonicalization and ABI parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// The signature does not follow the canonical grammar.
    #[error("malformed signature `{signature}`: {reason}")]
    MalformedSignature { signature: String, reason: String },

    /// The ABI document is not valid JSON or has an unexpected shape.
    #[error("invalid ABI: {0}")]
    InvalidAbi(String),
}

// =============================================================================
// PARSE ERRORS
// =============================================================================

/// Errors parsing hex-encoded value objects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Wrong number of bytes.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

// =============================================================================
// CLIENT ERRORS
// =============================================================================

/// Errors surfaced by typed clients calling into the host.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The call reverted; the payload is passed through unchanged.
    #[error("call reverted: {0}")]
    Reverted(Revert),

    /// Request encoding or response decoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ClientError {
    /// Revert reason, if the call reverted with one.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Reverted(revert) => revert.reason(),
            Self::Codec(_) => None,
        }
    }
}

impl From<Revert> for ClientError {
    fn from(revert: Revert) -> Self {
        Self::Reverted(revert)
    }
}

// =============================================================================
// TESTS
// =============================================================================
