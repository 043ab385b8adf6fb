//! Balance + ledger storage trait.

use crate::StoreError;
use arcana_types::{AccountId, EntrySource, LedgerEntry, Timestamp};
use serde::{Deserialize, Serialize};

/// A not-yet-persisted balance change.
///
/// The store assigns the entry id; callers provide everything else.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerMutation {
    pub created_at: Timestamp,
    pub source: EntrySource,
    /// Positive for grants, negative for consumption.
    pub delta: i64,
    pub reference: Option<String>,
    pub note: Option<String>,
}

/// The result of applying a mutation: the persisted entry and the counter
/// after the change.
#[derive(Clone, Debug)]
pub struct AppliedMutation {
    pub entry: LedgerEntry,
    pub new_balance: i64,
}

/// Trait for per-scope balance + append-only ledger storage.
///
/// `apply` must update the balance counter and append the entry in one
/// atomic unit — a failed write must never leave the counter and the entry
/// list disagreeing. Retention trimming (the backend drops the oldest
/// entries beyond its configured cap) is a storage-size control only: it
/// never touches the counter, and the counter is never recomputed from the
/// trimmed list.
pub trait CreditStore {
    /// The persisted balance counter for a scope (0 for a never-seen scope).
    fn balance(&self, scope: &AccountId) -> Result<i64, StoreError>;

    /// Atomically assign a sequence id, adjust the counter by
    /// `mutation.delta`, append the entry, and trim to the retention cap.
    fn apply(&self, scope: &AccountId, mutation: &LedgerMutation)
        -> Result<AppliedMutation, StoreError>;

    /// Up to `limit` retained entries, most recent first.
    fn recent_entries(
        &self,
        scope: &AccountId,
        limit: usize,
    ) -> Result<Vec<LedgerEntry>, StoreError>;

    /// All retained entries, oldest first.
    fn all_entries(&self, scope: &AccountId) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Number of retained entries for a scope.
    fn entry_count(&self, scope: &AccountId) -> Result<u64, StoreError>;
}
