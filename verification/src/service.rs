//! Independent verification of a claimed payment against chain state.

use arcana_chain::{ChainRpc, ChainRpcError};
use arcana_types::{TxSignature, WalletAddress};

use crate::VerificationError;

/// What the client claims happened on chain.
#[derive(Clone, Debug)]
pub struct VerificationRequest {
    pub signature: TxSignature,
    pub expected_recipient: WalletAddress,
    /// Minimum acceptable balance delta for the recipient, in minor units.
    pub expected_minimum: u64,
}

/// Re-verifies payments by fetching the transaction and checking the
/// recipient's balance movement.
pub struct VerificationService<C> {
    chain: C,
}

impl<C: ChainRpc> VerificationService<C> {
    pub fn new(chain: C) -> Self {
        Self { chain }
    }

    /// Check a claimed payment.
    ///
    /// Fails closed: a missing transaction, an on-chain execution error, an
    /// absent recipient, a short transfer, or any non-rate-limit fetch
    /// error all yield `Ok(false)`. Rate limiting propagates as an error —
    /// "couldn't check yet" must not be reported as "invalid".
    pub async fn verify(&self, request: &VerificationRequest) -> Result<bool, VerificationError> {
        let record = match self.chain.fetch_transaction(&request.signature).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::debug!(signature = %request.signature, "transaction not found");
                return Ok(false);
            }
            Err(ChainRpcError::RateLimited) => return Err(VerificationError::RateLimited),
            Err(e) => {
                tracing::warn!(signature = %request.signature, error = %e, "fetch failed, failing closed");
                return Ok(false);
            }
        };

        if let Some(err) = record.execution_error {
            tracing::debug!(signature = %request.signature, error = %err, "transaction failed on chain");
            return Ok(false);
        }

        match record.recipient_delta(request.expected_recipient.as_str()) {
            None => {
                tracing::debug!(
                    signature = %request.signature,
                    recipient = %request.expected_recipient,
                    "recipient not in transaction"
                );
                Ok(false)
            }
            Some(delta) if delta < i128::from(request.expected_minimum) => {
                tracing::debug!(
                    signature = %request.signature,
                    delta,
                    expected_minimum = request.expected_minimum,
                    "transfer below expected minimum"
                );
                Ok(false)
            }
            Some(_) => Ok(true),
        }
    }
}
