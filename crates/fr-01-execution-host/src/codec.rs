//! # Calling Convention
//!
//! How payloads look on the wire between frames:
//!
//! | Payload | Layout |
//! |---------|--------|
//! | calldata | `selector(signature) ++ bincode(argument tuple)` |
//! | constructor arguments | `bincode(argument tuple)` |
//! | return data | `bincode(return value)` |
//! | revert with reason | `selector("Error(string)") ++ bincode(reason)` |
//! | revert without reason | empty |
//!
//! Argument tuples follow the parameter order of the canonical signature.
//! A function without parameters takes `()`, which encodes to nothing.

use crate::domain::abi::selector_of;
use crate::domain::value_objects::{Bytes, Selector};
use crate::errors::CodecError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier prefixed to revert payloads that carry a reason string.
///
/// Equals `selector_of("Error(string)")`.
pub const REASON_SELECTOR: Selector = Selector([0x08, 0xc3, 0x79, 0xa0]);

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes an argument tuple without selector (constructor arguments).
pub fn encode_args<A: Serialize + ?Sized>(args: &A) -> Result<Bytes, CodecError> {
    bincode::serialize(args)
        .map(Bytes::from_vec)
        .map_err(|e| CodecError::Encode(e.to_string()))
}

/// Encodes a call to `signature` with the given argument tuple.
pub fn encode_call<A: Serialize + ?Sized>(signature: &str, args: &A) -> Result<Bytes, CodecError> {
    encode_call_with_selector(selector_of(signature), args)
}

/// Encodes a call to an already computed selector.
pub fn encode_call_with_selector<A: Serialize + ?Sized>(
    selector: Selector,
    args: &A,
) -> Result<Bytes, CodecError> {
    let encoded = bincode::serialize(args).map_err(|e| CodecError::Encode(e.to_string()))?;
    let mut data = Vec::with_capacity(4 + encoded.len());
    data.extend_from_slice(selector.as_bytes());
    data.extend_from_slice(&encoded);
    Ok(Bytes::from_vec(data))
}

/// Encodes a return value.
pub fn encode_return<R: Serialize + ?Sized>(value: &R) -> Result<Bytes, CodecError> {
    encode_args(value)
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes the argument tuple following the 4-byte selector.
pub fn decode_args<A: DeserializeOwned>(calldata: &[u8]) -> Result<A, CodecError> {
    if calldata.len() < 4 {
        return Err(CodecError::MissingSelector {
            len: calldata.len(),
        });
    }
    decode_payload(&calldata[4..])
}

/// Decodes constructor arguments (no selector).
pub fn decode_constructor_args<A: DeserializeOwned>(data: &[u8]) -> Result<A, CodecError> {
    decode_payload(data)
}

/// Decodes a return value.
pub fn decode_return<R: DeserializeOwned>(data: &[u8]) -> Result<R, CodecError> {
    decode_payload(data)
}

fn decode_payload<T: DeserializeOwned>(data: &[u8]) -> Result<T, CodecError> {
    bincode::deserialize(data).map_err(|e| CodecError::Decode(e.to_string()))
}

// =============================================================================
// REVERT
// =============================================================================

/// Failure payload of a frame.
///
/// Relayed verbatim by forwarding frames: a proxy that delegates to a failing
/// module returns the very same `Revert`.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Revert(Bytes);

impl Revert {
    /// Revert without any payload.
    #[must_use]
    pub fn empty() -> Self {
        Self(Bytes::new())
    }

    /// Revert carrying a human-readable reason.
    #[must_use]
    pub fn with_reason(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let mut data = REASON_SELECTOR.as_bytes().to_vec();
        // Serializing a String into a Vec cannot fail.
        data.extend(bincode::serialize(&reason).unwrap_or_default());
        Self(Bytes::from_vec(data))
    }

    /// Revert carrying raw, caller-defined data.
    #[must_use]
    pub fn from_data(data: Bytes) -> Self {
        Self(data)
    }

    /// Raw revert payload.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.0
    }

    /// True if the revert carries no payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decoded reason string, if the payload has the reason layout.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        let data = self.0.as_slice();
        if data.len() < 4 || data[..4] != REASON_SELECTOR.0 {
            return None;
        }
        bincode::deserialize(&data[4..]).ok()
    }
}

impl fmt::Display for Revert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => f.write_str(&reason),
            None if self.is_empty() => f.write_str("reverted without reason"),
            None => write!(f, "reverted with data {}", self.0),
        }
    }
}

impl fmt::Debug for Revert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "Revert({reason:?})"),
            None => write!(f, "Revert({:?})", self.0),
        }
    }
}

impl std::error::Error for Revert {}

// =============================================================================
// TESTS
// =============================================================================
