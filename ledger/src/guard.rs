//! Per-account mutation guard.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use arcana_types::AccountId;

/// Serializes ledger mutations per account.
///
/// `acquire` suspends cooperatively until the account's slot is free and
/// returns an owned guard; dropping the guard releases the slot, so release
/// happens on every exit path including errors. Guards for different
/// accounts never contend.
///
/// This is single-process only — two processes or devices sharing an
/// account are not protected.
pub struct MutationGuard {
    slots: StdMutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl MutationGuard {
    pub fn new() -> Self {
        Self {
            slots: StdMutex::new(HashMap::new()),
        }
    }

    /// Acquire the slot for an account, waiting if another mutation for the
    /// same account is in flight.
    pub async fn acquire(&self, account: &AccountId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().expect("guard registry poisoned");
            slots
                .entry(account.storage_key().to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        slot.lock_owned().await
    }
}

impl Default for MutationGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcana_types::WalletAddress;

    fn wallet_scope() -> AccountId {
        let addr =
            WalletAddress::parse("4Nd1mYvK7R2ZqpJcW8sThU6eDxGaBfLvMwPnQrSty9Ej").unwrap();
        AccountId::Wallet(addr)
    }

    #[tokio::test]
    async fn sequential_acquires_succeed() {
        let guard = MutationGuard::new();
        let scope = wallet_scope();
        drop(guard.acquire(&scope).await);
        drop(guard.acquire(&scope).await);
    }

    #[tokio::test]
    async fn held_guard_blocks_same_account() {
        let guard = Arc::new(MutationGuard::new());
        let scope = wallet_scope();
        let held = guard.acquire(&scope).await;

        let contender = {
            let guard = guard.clone();
            let scope = scope.clone();
            tokio::spawn(async move {
                guard.acquire(&scope).await;
            })
        };

        // The contender cannot finish while the guard is held.
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(held);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_accounts_do_not_contend() {
        let guard = MutationGuard::new();
        let _held = guard.acquire(&wallet_scope()).await;
        // Acquiring the fallback slot must not wait on the wallet slot.
        drop(guard.acquire(&AccountId::Fallback).await);
    }
}
