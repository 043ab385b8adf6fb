//! Deterministic test doubles for the Arcana credit ledger.
//!
//! Nothing here talks to disk or network — tests script the behavior they
//! need and assert on what was recorded.

pub mod chain;
pub mod store;

pub use chain::NullChainRpc;
pub use store::MemoryStore;
