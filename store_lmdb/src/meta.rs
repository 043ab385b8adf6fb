//! LMDB implementation of `MetaStore`.

use arcana_store::{MetaStore, StoreError};
use arcana_types::WalletAddress;

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

const LAST_KNOWN_ACCOUNT_KEY: &str = "last_known_account";

impl MetaStore for LmdbEnvironment {
    fn last_known_account(&self) -> Result<Option<WalletAddress>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .meta_db
            .get(&rtxn, LAST_KNOWN_ACCOUNT_KEY)
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let raw = std::str::from_utf8(bytes).map_err(|_| {
                    StoreError::Corruption("last known account is not UTF-8".to_string())
                })?;
                let addr = WalletAddress::parse(raw).map_err(|e| {
                    StoreError::Corruption(format!("last known account is invalid: {e}"))
                })?;
                Ok(Some(addr))
            }
            None => Ok(None),
        }
    }

    fn set_last_known_account(&self, address: &WalletAddress) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, LAST_KNOWN_ACCOUNT_KEY, address.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn clear_last_known_account(&self) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .delete(&mut wtxn, LAST_KNOWN_ACCOUNT_KEY)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
