//! Account scope — the isolation boundary for balances and ledgers.

use crate::WalletAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key segment for the device-local fallback scope.
const FALLBACK_KEY: &str = "default";

/// The account a ledger operation targets.
///
/// Every connected wallet gets its own balance/ledger pair; users who have
/// never connected a wallet share a single device-local fallback bucket.
/// Scopes are never merged — disconnecting a wallet does not move its
/// credits into the fallback bucket or vice versa.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountId {
    /// A connected wallet's scope.
    Wallet(WalletAddress),
    /// The device-local bucket for unauthenticated use.
    Fallback,
}

impl AccountId {
    /// The key segment under which this scope's balance and ledger persist.
    pub fn storage_key(&self) -> &str {
        match self {
            AccountId::Wallet(addr) => addr.as_str(),
            AccountId::Fallback => FALLBACK_KEY,
        }
    }

    /// The wallet address behind this scope, if any.
    pub fn wallet(&self) -> Option<&WalletAddress> {
        match self {
            AccountId::Wallet(addr) => Some(addr),
            AccountId::Fallback => None,
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.storage_key())
    }
}

impl From<WalletAddress> for AccountId {
    fn from(addr: WalletAddress) -> Self {
        AccountId::Wallet(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_scope_keys_by_address() {
        let addr = WalletAddress::parse("4Nd1mYvK7R2ZqpJcW8sThU6eDxGaBfLvMwPnQrSty9Ej").unwrap();
        let scope = AccountId::Wallet(addr.clone());
        assert_eq!(scope.storage_key(), addr.as_str());
        assert_eq!(scope.wallet(), Some(&addr));
    }

    #[test]
    fn fallback_scope_uses_fixed_key() {
        assert_eq!(AccountId::Fallback.storage_key(), "default");
        assert_eq!(AccountId::Fallback.wallet(), None);
    }
}
