//! # Update Blobs
//!
//! An update names its functions as one string: signature tokens each
//! followed by `;`, e.g. `owner();transferOwnership(address);`. The final
//! `;` is optional. `receive` and `fallback` stand for the two sentinels.

use crate::domain::registry::{signature_id, FALLBACK_TOKEN, RECEIVE_TOKEN};
use crate::errors::RegistryError;
use fr_01_execution_host::domain::abi::FunctionDescriptor;
use fr_01_execution_host::domain::value_objects::Selector;

/// One parsed token of an update blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureToken {
    /// Identifier the token routes.
    pub id: Selector,
    /// The token itself.
    pub signature: String,
}

/// Splits and validates a blob. Nothing is returned unless every token is
/// valid, so callers can apply the result without partial failure.
pub fn parse_signature_blob(blob: &str) -> Result<Vec<SignatureToken>, RegistryError> {
    let mut tokens: Vec<&str> = blob.split(';').collect();
    if tokens.last() == Some(&"") {
        tokens.pop();
    }

    tokens
        .into_iter()
        .map(|token| -> Result<SignatureToken, RegistryError> {
            validate_token(token)?;
            Ok(SignatureToken {
                id: signature_id(token),
                signature: token.to_string(),
            })
        })
        .collect()
}

fn validate_token(token: &str) -> Result<(), RegistryError> {
    if token.is_empty() {
        return Err(RegistryError::MalformedSignature {
            token: String::new(),
            reason: "empty signature".to_string(),
        });
    }
    if token == RECEIVE_TOKEN || token == FALLBACK_TOKEN {
        return Ok(());
    }
    FunctionDescriptor::parse(token)
        .map(|_| ())
        .map_err(|e| RegistryError::MalformedSignature {
            token: token.to_string(),
            reason: e.to_string(),
        })
}

// =============================================================================
// TESTS
// =============================================================================
