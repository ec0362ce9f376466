//! # Event Schema
//!
//! Typed events recorded in the transaction log.
//!
//! A log carries the emitting account, `topics[0] = keccak256(SIGNATURE)` and
//! the bincode-encoded event body. Reading a receipt back goes through
//! [`Event::from_log`], which checks the topic before decoding.

use crate::codec::encode_args;
use crate::domain::entities::Log;
use crate::domain::services::keccak256;
use crate::domain::value_objects::{Address, Hash};
use crate::errors::CodecError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// An event emitted by module code.
pub trait Event: Serialize + DeserializeOwned {
    /// Canonical event signature, e.g. `CommitMessage(string)`.
    const SIGNATURE: &'static str;

    /// First topic of every log of this event.
    #[must_use]
    fn topic() -> Hash {
        keccak256(Self::SIGNATURE.as_bytes())
    }

    /// Encodes the event as a log of `emitter`.
    fn to_log(&self, emitter: Address) -> Result<Log, CodecError> {
        Ok(Log::new(emitter, vec![Self::topic()], encode_args(self)?))
    }

    /// Decodes a log, if it is an instance of this event.
    #[must_use]
    fn from_log(log: &Log) -> Option<Self> {
        if log.topics.first() != Some(&Self::topic()) {
            return None;
        }
        bincode::deserialize(log.data.as_slice()).ok()
    }
}

/// All events of type `E` in `logs`, regardless of emitter.
#[must_use]
pub fn extract<E: Event>(logs: &[Log]) -> Vec<E> {
    logs.iter().filter_map(E::from_log).collect()
}

// =============================================================================
// TESTS
// =============================================================================
