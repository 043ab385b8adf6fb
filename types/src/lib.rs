//! Fundamental types for the Arcana credit ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: wallet addresses, account scopes, ledger entries, balances,
//! credit packs, transaction signatures, and timestamps.

pub mod account;
pub mod address;
pub mod balance;
pub mod entry;
pub mod error;
pub mod pack;
pub mod signature;
pub mod time;

pub use account::AccountId;
pub use address::WalletAddress;
pub use balance::BalanceReading;
pub use entry::{EntryId, EntrySource, LedgerEntry};
pub use error::AddressError;
pub use pack::CreditPack;
pub use signature::TxSignature;
pub use time::Timestamp;
