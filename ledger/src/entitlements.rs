//! Allow-list of unbounded accounts.

use std::collections::HashSet;

use arcana_types::{AccountId, AddressError, WalletAddress};

/// Accounts treated as having infinite balance.
///
/// Injected at startup (from configuration), never baked into the binary,
/// so test identities cannot leak into a production build. Unbounded
/// accounts read as `Unbounded` and consume without bookkeeping — their
/// consumption audit trail is intentionally incomplete.
#[derive(Clone, Debug, Default)]
pub struct Entitlements {
    unbounded: HashSet<WalletAddress>,
}

impl Entitlements {
    /// No unbounded accounts — the production default.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(unbounded: impl IntoIterator<Item = WalletAddress>) -> Self {
        Self {
            unbounded: unbounded.into_iter().collect(),
        }
    }

    /// Build from raw address strings, e.g. a config file list.
    pub fn from_addresses<I, S>(addresses: I) -> Result<Self, AddressError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unbounded = addresses
            .into_iter()
            .map(|s| WalletAddress::parse(s.into()))
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(Self { unbounded })
    }

    /// Whether this scope bypasses balance bookkeeping.
    ///
    /// The fallback scope is never unbounded.
    pub fn is_unbounded(&self, account: &AccountId) -> bool {
        match account.wallet() {
            Some(addr) => self.unbounded.contains(addr),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "4Nd1mYvK7R2ZqpJcW8sThU6eDxGaBfLvMwPnQrSty9Ej";

    #[test]
    fn listed_wallet_is_unbounded() {
        let addr = WalletAddress::parse(ADDR).unwrap();
        let entitlements = Entitlements::new([addr.clone()]);
        assert!(entitlements.is_unbounded(&AccountId::Wallet(addr)));
    }

    #[test]
    fn fallback_is_never_unbounded() {
        let entitlements = Entitlements::from_addresses([ADDR]).unwrap();
        assert!(!entitlements.is_unbounded(&AccountId::Fallback));
    }

    #[test]
    fn invalid_config_address_is_rejected() {
        assert!(Entitlements::from_addresses(["not-an-address"]).is_err());
    }
}
