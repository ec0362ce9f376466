//! # Error Types
//!
//! Failures of factory deployments. Each aborts the deployment frame and
//! leaves no trace of the attempt.

use fr_01_execution_host::codec::Revert;
use fr_01_execution_host::domain::value_objects::Address;
use fr_01_execution_host::errors::{CodecError, VmError};
use thiserror::Error;

/// Factory errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// The derived address already holds code or has a non-zero nonce.
    #[error("deployment address {0} is already occupied")]
    AddressOccupied(Address),

    /// The constructor, the post-deployment call or the host failed.
    #[error("deployment failed: {0}")]
    Deployment(VmError),

    /// Calldata could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<VmError> for FactoryError {
    fn from(err: VmError) -> Self {
        match err {
            VmError::ContractAlreadyExists(address) => Self::AddressOccupied(address),
            other => Self::Deployment(other),
        }
    }
}

impl From<FactoryError> for Revert {
    fn from(err: FactoryError) -> Self {
        match err {
            // Reverts of the constructor or the call pass through unchanged.
            FactoryError::Deployment(vm) => Revert::from(vm),
            other => Revert::with_reason(other.to_string()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
