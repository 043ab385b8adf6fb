//! LMDB environment setup.

use std::path::Path;

use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};

use arcana_store::StoreError;

use crate::LmdbError;

/// Default LMDB map size: 64 MiB, plenty for capped ledgers.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

/// Default retention cap: entries beyond this are trimmed, oldest first.
pub const DEFAULT_RETENTION_CAP: usize = 1000;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    pub(crate) env: Env,
    pub(crate) balances_db: Database<Str, Bytes>,
    pub(crate) ledger_db: Database<Str, Bytes>,
    pub(crate) meta_db: Database<Str, Bytes>,
    pub(crate) retention_cap: usize,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path with default
    /// sizing and retention.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::open_with(path, DEFAULT_MAP_SIZE, DEFAULT_RETENTION_CAP)
    }

    /// Open or create an LMDB environment with explicit map size and
    /// retention cap.
    pub fn open_with(
        path: &Path,
        map_size: usize,
        retention_cap: usize,
    ) -> Result<Self, StoreError> {
        std::fs::create_dir_all(path)
            .map_err(|e| StoreError::Backend(format!("create data dir: {e}")))?;

        // Safety: the environment directory is private to this process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(3)
                .open(path)
                .map_err(LmdbError::from)?
        };

        let mut wtxn = env.write_txn().map_err(LmdbError::from)?;
        let balances_db = env
            .create_database(&mut wtxn, Some("balances"))
            .map_err(LmdbError::from)?;
        let ledger_db = env
            .create_database(&mut wtxn, Some("ledger"))
            .map_err(LmdbError::from)?;
        let meta_db = env
            .create_database(&mut wtxn, Some("meta"))
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        tracing::debug!(path = %path.display(), retention_cap, "opened LMDB environment");

        Ok(Self {
            env,
            balances_db,
            ledger_db,
            meta_db,
            retention_cap,
        })
    }

    /// The configured retention cap.
    pub fn retention_cap(&self) -> usize {
        self.retention_cap
    }
}
