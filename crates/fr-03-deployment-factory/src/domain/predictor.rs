//! # Address Predictor
//!
//! Where a factory deployment lands, computed before it happens.
//!
//! ```text
//! address = keccak256(0xff ++ deployer ++ salt ++ keccak256(code))[12..]
//! salt'   = keccak256(salt ++ call)          (deploy-and-call only)
//! ```
//!
//! The derivation itself is the host's `compute_create2_address`, the same
//! function the host runs when it executes CREATE2.

use fr_01_execution_host::domain::services::{compute_create2_address, keccak256, keccak256_concat};
use fr_01_execution_host::domain::value_objects::{Address, Hash};

/// Pure CREATE2 address derivation.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddressPredictor;

impl AddressPredictor {
    /// Address for a deployer, salt and init code hash.
    #[must_use]
    pub fn predict(deployer: Address, salt: Hash, code_hash: Hash) -> Address {
        compute_create2_address(deployer, salt, code_hash)
    }

    /// Salt bound to a post-deployment call: `keccak256(salt ++ call)`.
    #[must_use]
    pub fn salt_with_call(salt: Hash, call: &[u8]) -> Hash {
        keccak256_concat(&[salt.as_bytes(), call])
    }

    /// Address of `code` deployed by `deployer` with `salt`.
    #[must_use]
    pub fn predict_code(deployer: Address, code: &[u8], salt: Hash) -> Address {
        Self::predict(deployer, salt, keccak256(code))
    }

    /// Address of `code` deployed by `deployer` with `salt` and then called
    /// with `call`.
    #[must_use]
    pub fn predict_code_with_call(deployer: Address, code: &[u8], salt: Hash, call: &[u8]) -> Address {
        Self::predict_code(deployer, code, Self::salt_with_call(salt, call))
    }
}

// =============================================================================
// TESTS
// =============================================================================
