//! LMDB storage backend for the Arcana credit ledger.
//!
//! Implements the storage traits from `arcana-store` using the `heed` LMDB
//! bindings. Three databases live in a single environment: `balances`
//! (counter per scope), `ledger` (entries keyed by scope + sequence), and
//! `meta` (sequence counters, entry counts, last known account).

pub mod credit;
pub mod environment;
pub mod error;
pub mod meta;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
