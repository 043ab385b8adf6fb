//! Nullable store — thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use arcana_store::{AppliedMutation, CreditStore, LedgerMutation, MetaStore, StoreError};
use arcana_types::{AccountId, EntryId, LedgerEntry, WalletAddress};

/// An in-memory balance + ledger + meta store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct MemoryStore {
    balances: Mutex<HashMap<String, i64>>,
    ledgers: Mutex<HashMap<String, Vec<LedgerEntry>>>,
    sequences: Mutex<HashMap<String, u64>>,
    last_known: Mutex<Option<WalletAddress>>,
    retention_cap: usize,
    /// When set, every operation fails with this backend message. Lets
    /// tests assert that storage failures propagate instead of being
    /// swallowed.
    fail_with: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_retention_cap(1000)
    }

    pub fn with_retention_cap(retention_cap: usize) -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            ledgers: Mutex::new(HashMap::new()),
            sequences: Mutex::new(HashMap::new()),
            last_known: Mutex::new(None),
            retention_cap,
            fail_with: Mutex::new(None),
        }
    }

    /// Make every subsequent operation fail with a backend error.
    pub fn fail_operations(&self, message: impl Into<String>) {
        *self.fail_with.lock().unwrap() = Some(message.into());
    }

    /// Restore normal operation.
    pub fn heal(&self) {
        *self.fail_with.lock().unwrap() = None;
    }

    fn check_healthy(&self) -> Result<(), StoreError> {
        match self.fail_with.lock().unwrap().as_ref() {
            Some(msg) => Err(StoreError::Backend(msg.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CreditStore for MemoryStore {
    fn balance(&self, scope: &AccountId) -> Result<i64, StoreError> {
        self.check_healthy()?;
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(scope.storage_key())
            .copied()
            .unwrap_or(0))
    }

    fn apply(
        &self,
        scope: &AccountId,
        mutation: &LedgerMutation,
    ) -> Result<AppliedMutation, StoreError> {
        self.check_healthy()?;
        let key = scope.storage_key().to_string();

        let mut balances = self.balances.lock().unwrap();
        let mut ledgers = self.ledgers.lock().unwrap();
        let mut sequences = self.sequences.lock().unwrap();

        let balance = balances.entry(key.clone()).or_insert(0);
        let new_balance = balance.checked_add(mutation.delta).ok_or_else(|| {
            StoreError::Corruption(format!("balance overflow for scope '{key}'"))
        })?;
        *balance = new_balance;

        let seq = sequences.entry(key.clone()).or_insert(0);
        *seq += 1;

        let entry = LedgerEntry {
            id: EntryId(*seq),
            created_at: mutation.created_at,
            source: mutation.source,
            delta: mutation.delta,
            reference: mutation.reference.clone(),
            note: mutation.note.clone(),
        };

        let ledger = ledgers.entry(key).or_default();
        ledger.push(entry.clone());
        if ledger.len() > self.retention_cap {
            let excess = ledger.len() - self.retention_cap;
            ledger.drain(..excess);
        }

        Ok(AppliedMutation { entry, new_balance })
    }

    fn recent_entries(
        &self,
        scope: &AccountId,
        limit: usize,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        self.check_healthy()?;
        Ok(self
            .ledgers
            .lock()
            .unwrap()
            .get(scope.storage_key())
            .map(|entries| entries.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn all_entries(&self, scope: &AccountId) -> Result<Vec<LedgerEntry>, StoreError> {
        self.check_healthy()?;
        Ok(self
            .ledgers
            .lock()
            .unwrap()
            .get(scope.storage_key())
            .cloned()
            .unwrap_or_default())
    }

    fn entry_count(&self, scope: &AccountId) -> Result<u64, StoreError> {
        self.check_healthy()?;
        Ok(self
            .ledgers
            .lock()
            .unwrap()
            .get(scope.storage_key())
            .map(|entries| entries.len() as u64)
            .unwrap_or(0))
    }
}

impl MetaStore for MemoryStore {
    fn last_known_account(&self) -> Result<Option<WalletAddress>, StoreError> {
        self.check_healthy()?;
        Ok(self.last_known.lock().unwrap().clone())
    }

    fn set_last_known_account(&self, address: &WalletAddress) -> Result<(), StoreError> {
        self.check_healthy()?;
        *self.last_known.lock().unwrap() = Some(address.clone());
        Ok(())
    }

    fn clear_last_known_account(&self) -> Result<(), StoreError> {
        self.check_healthy()?;
        *self.last_known.lock().unwrap() = None;
        Ok(())
    }
}
