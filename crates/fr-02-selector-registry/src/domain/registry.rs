//! # Function Registry
//!
//! The routing table of a dispatch proxy: an ordered sequence of entries
//! plus two indexes over it.
//!
//! | Structure | Maps |
//! |-----------|------|
//! | `entries` | ordinal -> entry |
//! | `positions` | identifier -> ordinal |
//! | `by_delegate` | delegate -> identifiers |
//!
//! All three change only through [`FunctionRegistry::set_function`], which
//! keeps them in lockstep. Removal compacts by moving the last entry into the
//! freed slot, so removing one entry changes the ordinal of at most one other.

use crate::errors::RegistryError;
use crate::events::FunctionUpdate;
use fr_01_execution_host::domain::value_objects::{Address, Selector, U256};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One live route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntry {
    /// 4-byte identifier.
    pub id: Selector,
    /// Signature token the route was registered with.
    pub signature: String,
    /// Module executing the function. Never zero in a live entry.
    pub delegate: Address,
}

impl FunctionEntry {
    /// Result of a lookup for an unknown identifier.
    #[must_use]
    pub fn absent(id: Selector) -> Self {
        Self {
            id,
            signature: String::new(),
            delegate: Address::ZERO,
        }
    }
}

/// Identifier-to-delegate routing table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRegistry {
    entries: Vec<FunctionEntry>,
    positions: BTreeMap<Selector, usize>,
    by_delegate: BTreeMap<Address, BTreeSet<Selector>>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Routes `id` to `delegate`; the zero delegate removes the route.
    ///
    /// Returns the change, or `None` when `delegate` is already current.
    pub fn set_function(
        &mut self,
        id: Selector,
        signature: &str,
        delegate: Address,
    ) -> Option<FunctionUpdate> {
        let current = self.delegate_of(id).unwrap_or(Address::ZERO);
        if delegate == current {
            return None;
        }

        if delegate.is_zero() {
            self.remove(id, current);
        } else if current.is_zero() {
            self.append(id, signature, delegate);
        } else {
            self.replace(id, current, delegate);
        }

        Some(FunctionUpdate {
            function_id: id,
            old_delegate: current,
            new_delegate: delegate,
            function_signature: signature.to_string(),
        })
    }

    fn append(&mut self, id: Selector, signature: &str, delegate: Address) {
        self.positions.insert(id, self.entries.len());
        self.entries.push(FunctionEntry {
            id,
            signature: signature.to_string(),
            delegate,
        });
        self.by_delegate.entry(delegate).or_default().insert(id);
    }

    fn replace(&mut self, id: Selector, current: Address, delegate: Address) {
        if let Some(&position) = self.positions.get(&id) {
            self.entries[position].delegate = delegate;
        }
        self.unlink(id, current);
        self.by_delegate.entry(delegate).or_default().insert(id);
    }

    fn remove(&mut self, id: Selector, current: Address) {
        let Some(position) = self.positions.remove(&id) else {
            return;
        };
        self.entries.swap_remove(position);
        if let Some(moved) = self.entries.get(position) {
            self.positions.insert(moved.id, position);
        }
        self.unlink(id, current);
    }

    fn unlink(&mut self, id: Selector, delegate: Address) {
        if let Some(ids) = self.by_delegate.get_mut(&delegate) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_delegate.remove(&delegate);
            }
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live entries in ordinal order.
    #[must_use]
    pub fn entries(&self) -> &[FunctionEntry] {
        &self.entries
    }

    /// Entry at an ordinal.
    pub fn entry_at(&self, index: U256) -> Result<&FunctionEntry, RegistryError> {
        let out_of_range = || RegistryError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        };
        if index >= U256::from(self.entries.len()) {
            return Err(out_of_range());
        }
        usize::try_from(index.low_u64())
            .ok()
            .and_then(|i| self.entries.get(i))
            .ok_or_else(out_of_range)
    }

    /// Entry for an identifier, or [`FunctionEntry::absent`].
    #[must_use]
    pub fn entry_by_id(&self, id: Selector) -> FunctionEntry {
        self.positions
            .get(&id)
            .and_then(|&i| self.entries.get(i))
            .cloned()
            .unwrap_or_else(|| FunctionEntry::absent(id))
    }

    /// Delegate routed for an identifier.
    #[must_use]
    pub fn delegate_of(&self, id: Selector) -> Option<Address> {
        self.positions
            .get(&id)
            .and_then(|&i| self.entries.get(i))
            .map(|e| e.delegate)
    }

    /// Delegate routed for a signature string, zero if none.
    #[must_use]
    pub fn delegate_of_signature(&self, signature: &str) -> Address {
        self.delegate_of(signature_id(signature))
            .unwrap_or(Address::ZERO)
    }

    /// Returns true if the signature is routed.
    #[must_use]
    pub fn contains_signature(&self, signature: &str) -> bool {
        self.positions.contains_key(&signature_id(signature))
    }

    /// All signatures in ordinal order, each followed by `;`.
    #[must_use]
    pub fn signatures(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{};", e.signature))
            .collect()
    }

    /// Signatures routed to `delegate` in ordinal order, each followed by `;`.
    #[must_use]
    pub fn delegate_signatures(&self, delegate: Address) -> String {
        self.entries
            .iter()
            .filter(|e| e.delegate == delegate)
            .map(|e| format!("{};", e.signature))
            .collect()
    }

    /// Distinct delegates in order of first appearance in the sequence.
    #[must_use]
    pub fn delegates(&self) -> Vec<Address> {
        let mut seen = BTreeSet::new();
        self.entries
            .iter()
            .filter(|e| seen.insert(e.delegate))
            .map(|e| e.delegate)
            .collect()
    }

    // =========================================================================
    // CONSISTENCY
    // =========================================================================

    /// Verifies that the sequence and both indexes describe the same routes.
    pub fn check_consistency(&self) -> Result<(), String> {
        if self.positions.len() != self.entries.len() {
            return Err(format!(
                "{} positions for {} entries",
                self.positions.len(),
                self.entries.len()
            ));
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.delegate.is_zero() {
                return Err(format!("entry {i} ({}) has the zero delegate", entry.id));
            }
            if self.positions.get(&entry.id) != Some(&i) {
                return Err(format!("entry {i} ({}) is not indexed at {i}", entry.id));
            }
            let indexed = self
                .by_delegate
                .get(&entry.delegate)
                .is_some_and(|ids| ids.contains(&entry.id));
            if !indexed {
                return Err(format!("entry {i} ({}) missing from delegate index", entry.id));
            }
        }
        let indexed: usize = self.by_delegate.values().map(BTreeSet::len).sum();
        if indexed != self.entries.len() {
            return Err(format!(
                "delegate index holds {indexed} ids for {} entries",
                self.entries.len()
            ));
        }
        Ok(())
    }
}

/// Identifier of a signature token, including the two sentinel tokens.
#[must_use]
pub fn signature_id(signature: &str) -> Selector {
    match signature {
        RECEIVE_TOKEN => Selector::RECEIVE,
        FALLBACK_TOKEN => Selector::FALLBACK,
        other => fr_01_execution_host::domain::abi::selector_of(other),
    }
}

/// Token routing calls without calldata.
pub const RECEIVE_TOKEN: &str = "receive";

/// Token routing calls that match no identifier.
pub const FALLBACK_TOKEN: &str = "fallback";

// =============================================================================
// TESTS
// =============================================================================
