//! The Arcana credit ledger.
//!
//! [`CreditLedger`] is the only writer of the persisted balance/ledger
//! pairs. Every mutation runs under the per-account [`MutationGuard`], so
//! concurrent grants and consumptions for the same account are totally
//! ordered and never apply against a stale balance snapshot.

pub mod credit;
pub mod entitlements;
pub mod error;
pub mod guard;
pub mod scope;

pub use credit::CreditLedger;
pub use entitlements::Entitlements;
pub use error::LedgerError;
pub use guard::MutationGuard;
pub use scope::AccountScope;
