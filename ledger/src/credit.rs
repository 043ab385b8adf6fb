//! The credit ledger facade — the only writer of balance/ledger pairs.

use std::sync::Arc;

use arcana_store::{CreditStore, LedgerMutation};
use arcana_types::{AccountId, BalanceReading, EntrySource, LedgerEntry, Timestamp};

use crate::entitlements::Entitlements;
use crate::guard::MutationGuard;
use crate::LedgerError;

/// Per-account credit balances backed by an append-only ledger.
///
/// Balances and entries are persisted together atomically by the store;
/// this type adds the allow-list override, the sufficiency check on
/// consumption, and the per-account mutation guard. Storage failures
/// propagate unmodified — a failed write is never reported as success.
pub struct CreditLedger<S> {
    store: Arc<S>,
    entitlements: Entitlements,
    guard: MutationGuard,
}

impl<S: CreditStore> CreditLedger<S> {
    pub fn new(store: Arc<S>, entitlements: Entitlements) -> Self {
        Self {
            store,
            entitlements,
            guard: MutationGuard::new(),
        }
    }

    /// Read a scope's balance. No side effects; allow-listed accounts read
    /// as `Unbounded` without touching storage.
    pub fn balance(&self, account: &AccountId) -> Result<BalanceReading, LedgerError> {
        if self.entitlements.is_unbounded(account) {
            return Ok(BalanceReading::Unbounded);
        }
        Ok(BalanceReading::Credits(self.store.balance(account)?))
    }

    /// Credit an account. Returns the new balance.
    pub async fn grant(
        &self,
        account: &AccountId,
        credits: u32,
        source: EntrySource,
        reference: Option<String>,
        note: Option<String>,
    ) -> Result<i64, LedgerError> {
        if credits == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let _slot = self.guard.acquire(account).await;
        let applied = self.store.apply(
            account,
            &LedgerMutation {
                created_at: Timestamp::now(),
                source,
                delta: i64::from(credits),
                reference,
                note,
            },
        )?;

        tracing::info!(
            account = account.storage_key(),
            credits,
            %source,
            balance = applied.new_balance,
            entry = %applied.entry.id,
            "credits granted"
        );
        Ok(applied.new_balance)
    }

    /// Spend credits unlocking an operation. Returns the new balance, or
    /// `Unbounded` (with no mutation) for allow-listed accounts.
    pub async fn consume(
        &self,
        account: &AccountId,
        cost: u32,
        operation_id: &str,
    ) -> Result<BalanceReading, LedgerError> {
        if self.entitlements.is_unbounded(account) {
            tracing::debug!(
                account = account.storage_key(),
                operation_id,
                "unbounded account, consumption skipped"
            );
            return Ok(BalanceReading::Unbounded);
        }
        if cost == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let _slot = self.guard.acquire(account).await;
        let available = self.store.balance(account)?;
        if available < i64::from(cost) {
            return Err(LedgerError::InsufficientCredits {
                requested: cost,
                available,
                operation_id: operation_id.to_string(),
            });
        }

        let applied = self.store.apply(
            account,
            &LedgerMutation {
                created_at: Timestamp::now(),
                source: EntrySource::Consumption,
                delta: -i64::from(cost),
                reference: None,
                note: Some(operation_id.to_string()),
            },
        )?;

        tracing::info!(
            account = account.storage_key(),
            cost,
            operation_id,
            balance = applied.new_balance,
            "credits consumed"
        );
        Ok(BalanceReading::Credits(applied.new_balance))
    }

    /// Up to `limit` retained entries, most recent first.
    pub fn recent_entries(
        &self,
        account: &AccountId,
        limit: usize,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.store.recent_entries(account, limit)?)
    }

    /// All retained entries, oldest first.
    pub fn full_ledger(&self, account: &AccountId) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.store.all_entries(account)?)
    }

    /// Number of retained entries.
    pub fn entry_count(&self, account: &AccountId) -> Result<u64, LedgerError> {
        Ok(self.store.entry_count(account)?)
    }
}
