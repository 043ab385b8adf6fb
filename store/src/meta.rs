//! Metadata storage trait.

use crate::StoreError;
use arcana_types::WalletAddress;

/// Trait for small singleton values outside the per-scope keyspace.
///
/// Currently only the last known wallet address, which lets account scope
/// resolution survive a process restart.
pub trait MetaStore {
    fn last_known_account(&self) -> Result<Option<WalletAddress>, StoreError>;
    fn set_last_known_account(&self, address: &WalletAddress) -> Result<(), StoreError>;
    fn clear_last_known_account(&self) -> Result<(), StoreError>;
}
