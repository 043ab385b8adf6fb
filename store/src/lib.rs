//! Abstract storage traits for the Arcana credit ledger.
//!
//! Every storage backend (LMDB on device, in-memory for testing) implements
//! these traits. The rest of the codebase depends only on the traits.

pub mod credit;
pub mod error;
pub mod meta;

pub use credit::{AppliedMutation, CreditStore, LedgerMutation};
pub use error::StoreError;
pub use meta::MetaStore;
