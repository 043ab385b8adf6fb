//! LMDB implementation of `CreditStore`.
//!
//! Key formats:
//! - `balances` db: `<scope-key>` → i64 little-endian bytes.
//! - `ledger` db: `<scope-key> 0x1f <seq as 20-digit zero-padded>` → bincode
//!   [`LedgerEntry`]. The 0x1f separator never occurs in a scope key (base58
//!   or `"default"`), so prefix scans are exact and lexicographic order
//!   equals sequence order.
//! - `meta` db: `entry_seq:<scope-key>` and `entry_count:<scope-key>` → u64
//!   little-endian bytes. The sequence counter survives retention trimming,
//!   so entry ids are never reused.

use heed::types::{Bytes, Str};
use heed::{Database, RoTxn};

use arcana_store::{AppliedMutation, CreditStore, LedgerMutation, StoreError};
use arcana_types::{AccountId, EntryId, LedgerEntry};

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

const SEPARATOR: char = '\u{1f}';

fn ledger_prefix(scope: &AccountId) -> String {
    format!("{}{SEPARATOR}", scope.storage_key())
}

fn entry_key(scope: &AccountId, seq: u64) -> String {
    format!("{}{SEPARATOR}{seq:020}", scope.storage_key())
}

fn seq_key(scope: &AccountId) -> String {
    format!("entry_seq:{}", scope.storage_key())
}

fn count_key(scope: &AccountId) -> String {
    format!("entry_count:{}", scope.storage_key())
}

fn read_i64(
    db: &Database<Str, Bytes>,
    txn: &RoTxn,
    key: &str,
) -> Result<Option<i64>, StoreError> {
    match db.get(txn, key).map_err(LmdbError::from)? {
        Some(bytes) => {
            let arr: [u8; 8] = bytes.try_into().map_err(|_| {
                StoreError::Corruption(format!("value for '{key}' has unexpected byte length"))
            })?;
            Ok(Some(i64::from_le_bytes(arr)))
        }
        None => Ok(None),
    }
}

fn read_u64(
    db: &Database<Str, Bytes>,
    txn: &RoTxn,
    key: &str,
) -> Result<Option<u64>, StoreError> {
    match db.get(txn, key).map_err(LmdbError::from)? {
        Some(bytes) => {
            let arr: [u8; 8] = bytes.try_into().map_err(|_| {
                StoreError::Corruption(format!("value for '{key}' has unexpected byte length"))
            })?;
            Ok(Some(u64::from_le_bytes(arr)))
        }
        None => Ok(None),
    }
}

impl CreditStore for LmdbEnvironment {
    fn balance(&self, scope: &AccountId) -> Result<i64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(read_i64(&self.balances_db, &rtxn, scope.storage_key())?.unwrap_or(0))
    }

    fn apply(
        &self,
        scope: &AccountId,
        mutation: &LedgerMutation,
    ) -> Result<AppliedMutation, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let scope_key = scope.storage_key();

        let current = read_i64(&self.balances_db, &wtxn, scope_key)?.unwrap_or(0);
        let new_balance = current.checked_add(mutation.delta).ok_or_else(|| {
            StoreError::Corruption(format!("balance overflow for scope '{scope_key}'"))
        })?;
        self.balances_db
            .put(&mut wtxn, scope_key, &new_balance.to_le_bytes())
            .map_err(LmdbError::from)?;

        let sk = seq_key(scope);
        let seq = read_u64(&self.meta_db, &wtxn, &sk)?.unwrap_or(0) + 1;
        self.meta_db
            .put(&mut wtxn, &sk, &seq.to_le_bytes())
            .map_err(LmdbError::from)?;

        let entry = LedgerEntry {
            id: EntryId(seq),
            created_at: mutation.created_at,
            source: mutation.source,
            delta: mutation.delta,
            reference: mutation.reference.clone(),
            note: mutation.note.clone(),
        };
        let bytes = bincode::serialize(&entry).map_err(LmdbError::from)?;
        self.ledger_db
            .put(&mut wtxn, &entry_key(scope, seq), &bytes)
            .map_err(LmdbError::from)?;

        let ck = count_key(scope);
        let mut count = read_u64(&self.meta_db, &wtxn, &ck)?.unwrap_or(0) + 1;

        if count as usize > self.retention_cap {
            let excess = count as usize - self.retention_cap;
            let prefix = ledger_prefix(scope);
            let mut stale = Vec::with_capacity(excess);
            {
                let iter = self
                    .ledger_db
                    .prefix_iter(&wtxn, &prefix)
                    .map_err(LmdbError::from)?;
                for item in iter.take(excess) {
                    let (key, _) = item.map_err(LmdbError::from)?;
                    stale.push(key.to_string());
                }
            }
            for key in &stale {
                self.ledger_db
                    .delete(&mut wtxn, key)
                    .map_err(LmdbError::from)?;
            }
            count -= stale.len() as u64;
            tracing::trace!(scope = scope_key, trimmed = stale.len(), "ledger retention trim");
        }

        self.meta_db
            .put(&mut wtxn, &ck, &count.to_le_bytes())
            .map_err(LmdbError::from)?;

        wtxn.commit().map_err(LmdbError::from)?;
        Ok(AppliedMutation { entry, new_balance })
    }

    fn recent_entries(
        &self,
        scope: &AccountId,
        limit: usize,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = ledger_prefix(scope);
        let mut entries = Vec::new();
        let iter = self
            .ledger_db
            .rev_prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?;
        for item in iter.take(limit) {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            let entry: LedgerEntry = bincode::deserialize(bytes).map_err(LmdbError::from)?;
            entries.push(entry);
        }
        Ok(entries)
    }

    fn all_entries(&self, scope: &AccountId) -> Result<Vec<LedgerEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = ledger_prefix(scope);
        let mut entries = Vec::new();
        let iter = self
            .ledger_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?;
        for item in iter {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            let entry: LedgerEntry = bincode::deserialize(bytes).map_err(LmdbError::from)?;
            entries.push(entry);
        }
        Ok(entries)
    }

    fn entry_count(&self, scope: &AccountId) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(read_u64(&self.meta_db, &rtxn, &count_key(scope))?.unwrap_or(0))
    }
}
