//! # Journaled World State
//!
//! Accounts plus an undo journal. Every mutation records the previous value
//! so that a failed frame can be rolled back to its checkpoint exactly,
//! including the logs it emitted.

use crate::domain::entities::{Account, Log};
use crate::domain::value_objects::{Address, Bytes, StorageKey, U256};
use crate::errors::VmError;
use std::collections::HashMap;

/// A single undoable mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JournalEntry {
    /// Account did not exist before.
    AccountCreated { address: Address },
    /// Balance changed.
    BalanceChanged { address: Address, previous: U256 },
    /// Nonce changed.
    NonceChanged { address: Address, previous: u64 },
    /// Code changed.
    CodeChanged { address: Address, previous: Bytes },
    /// Storage slot changed.
    StorageChanged {
        address: Address,
        key: StorageKey,
        previous: Option<Bytes>,
    },
}

/// Position in the journal and the log to roll back to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    journal_len: usize,
    log_len: usize,
}

/// Accounts, undo journal and pending logs of the current transaction.
#[derive(Debug, Default)]
pub struct WorldState {
    accounts: HashMap<Address, Account>,
    journal: Vec<JournalEntry>,
    logs: Vec<Log>,
}

impl WorldState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Returns the account, if it exists.
    #[must_use]
    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Balance of an account (zero if absent).
    #[must_use]
    pub fn balance(&self, address: &Address) -> U256 {
        self.accounts
            .get(address)
            .map_or_else(U256::zero, |a| a.balance)
    }

    /// Nonce of an account (zero if absent).
    #[must_use]
    pub fn nonce(&self, address: &Address) -> u64 {
        self.accounts.get(address).map_or(0, |a| a.nonce)
    }

    /// Code of an account (empty if absent).
    #[must_use]
    pub fn code(&self, address: &Address) -> Bytes {
        self.accounts
            .get(address)
            .map(|a| a.code.clone())
            .unwrap_or_default()
    }

    /// Raw storage slot.
    #[must_use]
    pub fn storage(&self, address: &Address, key: &StorageKey) -> Option<&Bytes> {
        self.accounts.get(address).and_then(|a| a.storage.get(key))
    }

    /// Logs emitted so far in the current transaction.
    #[must_use]
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// Number of journal entries not yet committed.
    #[must_use]
    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    fn touch(&mut self, address: Address) -> &mut Account {
        if !self.accounts.contains_key(&address) {
            self.journal.push(JournalEntry::AccountCreated { address });
        }
        self.accounts.entry(address).or_default()
    }

    /// Sets the balance of an account.
    pub fn set_balance(&mut self, address: Address, balance: U256) {
        let account = self.touch(address);
        let previous = std::mem::replace(&mut account.balance, balance);
        self.journal
            .push(JournalEntry::BalanceChanged { address, previous });
    }

    /// Sets the nonce of an account.
    pub fn set_nonce(&mut self, address: Address, nonce: u64) {
        let account = self.touch(address);
        let previous = std::mem::replace(&mut account.nonce, nonce);
        self.journal.push(JournalEntry::NonceChanged { address, previous });
    }

    /// Increments the nonce of an account.
    pub fn increment_nonce(&mut self, address: Address) {
        let nonce = self.nonce(&address).saturating_add(1);
        self.set_nonce(address, nonce);
    }

    /// Installs code on an account.
    pub fn set_code(&mut self, address: Address, code: Bytes) {
        let account = self.touch(address);
        let previous = std::mem::replace(&mut account.code, code);
        self.journal.push(JournalEntry::CodeChanged { address, previous });
    }

    /// Writes a raw storage slot.
    pub fn set_storage(&mut self, address: Address, key: StorageKey, value: Bytes) {
        let account = self.touch(address);
        let previous = account.storage.insert(key, value);
        self.journal.push(JournalEntry::StorageChanged {
            address,
            key,
            previous,
        });
    }

    /// Moves `amount` from one account to another.
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), VmError> {
        if amount.is_zero() {
            return Ok(());
        }
        let available = self.balance(&from);
        if available < amount {
            return Err(VmError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        self.set_balance(from, available - amount);
        let credited = self.balance(&to).saturating_add(amount);
        self.set_balance(to, credited);
        Ok(())
    }

    /// Appends a log.
    pub fn push_log(&mut self, log: Log) {
        self.logs.push(log);
    }

    // -------------------------------------------------------------------------
    // Journal
    // -------------------------------------------------------------------------

    /// Marks the current position.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            journal_len: self.journal.len(),
            log_len: self.logs.len(),
        }
    }

    /// Undoes every mutation made after `checkpoint`, newest first.
    pub fn revert_to(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.journal_len {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            self.undo(entry);
        }
        self.logs.truncate(checkpoint.log_len);
    }

    fn undo(&mut self, entry: JournalEntry) {
        match entry {
            JournalEntry::AccountCreated { address } => {
                self.accounts.remove(&address);
            }
            JournalEntry::BalanceChanged { address, previous } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.balance = previous;
                }
            }
            JournalEntry::NonceChanged { address, previous } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.nonce = previous;
                }
            }
            JournalEntry::CodeChanged { address, previous } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.code = previous;
                }
            }
            JournalEntry::StorageChanged {
                address,
                key,
                previous,
            } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    match previous {
                        Some(value) => account.storage.insert(key, value),
                        None => account.storage.remove(&key),
                    };
                }
            }
        }
    }

    /// Makes all pending mutations permanent and hands out the pending logs.
    pub fn commit(&mut self) -> Vec<Log> {
        self.journal.clear();
        std::mem::take(&mut self.logs)
    }
}

// =============================================================================
// TESTS
// =============================================================================
