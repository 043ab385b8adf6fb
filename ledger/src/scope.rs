//! Account scope resolution.

use std::sync::{Arc, Mutex as StdMutex};

use arcana_store::MetaStore;
use arcana_types::{AccountId, WalletAddress};

use crate::LedgerError;

/// Resolves which account's ledger/balance a call targets.
///
/// Priority order: an explicit account parameter, else the currently
/// connected wallet, else the persisted last-known wallet (loaded into the
/// current slot by [`AccountScope::restore`] so account data survives a
/// restart), else the device-local fallback bucket.
pub struct AccountScope<S> {
    store: Arc<S>,
    current: StdMutex<Option<WalletAddress>>,
}

impl<S: MetaStore> AccountScope<S> {
    /// Create a scope resolver, restoring the last known wallet address
    /// from storage.
    pub fn restore(store: Arc<S>) -> Result<Self, LedgerError> {
        let last_known = store.last_known_account()?;
        if let Some(ref addr) = last_known {
            tracing::debug!(account = %addr, "restored last known account");
        }
        Ok(Self {
            store,
            current: StdMutex::new(last_known),
        })
    }

    /// Record a wallet connection. Persists the address so the scope
    /// survives a process restart.
    pub fn set_current(&self, address: WalletAddress) -> Result<(), LedgerError> {
        self.store.set_last_known_account(&address)?;
        *self.current.lock().expect("scope state poisoned") = Some(address);
        Ok(())
    }

    /// The currently resolved wallet, if any.
    pub fn current(&self) -> Option<WalletAddress> {
        self.current.lock().expect("scope state poisoned").clone()
    }

    /// Record a wallet disconnect.
    ///
    /// Clears the persisted last-known address too: a disconnected wallet's
    /// scope must not silently resurrect after a restart. The fallback
    /// bucket's balance is untouched — scopes never merge.
    pub fn clear_current(&self) -> Result<(), LedgerError> {
        self.store.clear_last_known_account()?;
        *self.current.lock().expect("scope state poisoned") = None;
        Ok(())
    }

    /// Resolve the scope an operation targets.
    pub fn resolve(&self, explicit: Option<&WalletAddress>) -> AccountId {
        if let Some(addr) = explicit {
            return AccountId::Wallet(addr.clone());
        }
        match self.current() {
            Some(addr) => AccountId::Wallet(addr),
            None => AccountId::Fallback,
        }
    }
}
