//! Ledger entries — immutable records of balance changes.

use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-scope sequence number assigned by the store at append time.
///
/// The counter behind it is persisted independently of the entry list, so
/// retention trimming can never cause an id to be reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What caused a balance change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntrySource {
    /// In-app purchase settled through the platform store.
    StorePurchase,
    /// On-chain micropayment confirmed at "confirmed" commitment.
    ChainPayment,
    /// Credits spent unlocking a reading.
    Consumption,
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntrySource::StorePurchase => "store-purchase",
            EntrySource::ChainPayment => "chain-payment",
            EntrySource::Consumption => "consumption",
        };
        write!(f, "{s}")
    }
}

/// One immutable, append-only record of a balance change.
///
/// Entries are created only by grants and consumptions; they are never
/// mutated or deleted individually, only bulk-trimmed by retention.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub created_at: Timestamp,
    pub source: EntrySource,
    /// Positive for grants, negative for consumption.
    pub delta: i64,
    /// External reference: a store purchase token for `StorePurchase`,
    /// a base58 transaction signature for `ChainPayment`, absent for
    /// `Consumption`.
    pub reference: Option<String>,
    /// Free text, e.g. the reading identifier that triggered a consumption.
    pub note: Option<String>,
}
