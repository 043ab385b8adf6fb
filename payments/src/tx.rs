//! Unsigned transfer construction.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use arcana_types::WalletAddress;

use crate::PaymentError;

/// An unsigned transfer, ready for the wallet to sign and broadcast.
///
/// Moves exactly `amount_minor_units` from the payer (who is also the
/// fee-payer) to the treasury recipient, stamped with a recent finalized
/// blockhash so the cluster accepts it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferDraft {
    pub payer: WalletAddress,
    pub recipient: WalletAddress,
    pub amount_minor_units: u64,
    pub recent_blockhash: String,
}

impl TransferDraft {
    /// Encode into the base64 byte-string the wallet transport requires.
    pub fn encode_base64(&self) -> Result<String, PaymentError> {
        let bytes = bincode::serialize(self).map_err(|e| {
            PaymentError::BroadcastOrConfirmFailed(format!("transfer encoding failed: {e}"))
        })?;
        Ok(BASE64.encode(bytes))
    }
}
