//! Transaction signature type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A base58-encoded transaction signature.
///
/// The wallet transport returns signatures in base64; everything downstream
/// (chain RPC, explorer links, the verify endpoint) expects base58. This
/// newtype only ever holds the base58 form — normalization happens at the
/// wallet boundary in `arcana-payments`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxSignature(String);

impl TxSignature {
    /// Wrap an already-base58 signature string.
    pub fn new(base58: impl Into<String>) -> Self {
        Self(base58.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
