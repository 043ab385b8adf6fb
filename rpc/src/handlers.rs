//! RPC request handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use blake2::{Blake2s256, Digest};

use arcana_chain::ChainRpc;
use arcana_types::{TxSignature, WalletAddress};
use arcana_verification::{
    verify_with_retry, RetryPolicy, VerificationRequest, VerificationService,
    VerifyAndGrantRequest, VerifyAndGrantResponse,
};

use crate::RpcError;

/// Shared state for the verification routes.
pub struct AppState<C> {
    pub verifier: VerificationService<C>,
    pub policy: RetryPolicy,
    /// The only recipient this deployment verifies payments for.
    pub treasury: WalletAddress,
}

/// Server-derived audit reference for one verification request.
///
/// Lets client-side audit logs and server logs name the same check without
/// the server holding any ledger of its own.
pub fn ledger_ref(user_id: &str, tx_signature: &str) -> String {
    let mut hasher = Blake2s256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(b":");
    hasher.update(tx_signature.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

/// `POST /v1/payments/verify-and-grant`
///
/// Independently re-checks a claimed chain payment. The endpoint holds no
/// canonical ledger: on success it echoes the claimed credit delta back for
/// the client's audit log.
pub async fn verify_and_grant<C: ChainRpc + Send + Sync + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Json(request): Json<VerifyAndGrantRequest>,
) -> Result<Json<VerifyAndGrantResponse>, RpcError> {
    let ledger_ref = ledger_ref(&request.user_id, &request.tx_signature);

    if request.tx_signature.is_empty() {
        return Err(RpcError::InvalidRequest {
            reason: "txSignature must not be empty".to_string(),
            ledger_ref,
        });
    }
    if request.expected_amount_min == 0 {
        return Err(RpcError::InvalidRequest {
            reason: "expectedAmountMin must be positive".to_string(),
            ledger_ref,
        });
    }
    let expected_recipient = WalletAddress::parse(request.expected_recipient.as_str())
        .map_err(|e| RpcError::InvalidRequest {
            reason: format!("expectedRecipient: {e}"),
            ledger_ref: ledger_ref.clone(),
        })?;
    // The client names a recipient, but only the configured treasury is
    // ever verified against.
    if expected_recipient != state.treasury {
        return Err(RpcError::InvalidRequest {
            reason: "expectedRecipient does not match this deployment's treasury".to_string(),
            ledger_ref,
        });
    }

    let verification = VerificationRequest {
        signature: TxSignature::new(request.tx_signature.clone()),
        expected_recipient,
        expected_minimum: request.expected_amount_min,
    };

    match verify_with_retry(&state.verifier, &verification, &state.policy).await {
        Ok(true) => {
            tracing::info!(
                user = %request.user_id,
                signature = %request.tx_signature,
                ledger_ref = %ledger_ref,
                credits = request.credit_delta,
                "payment verified"
            );
            Ok(Json(VerifyAndGrantResponse {
                ok: true,
                granted_credits: request.credit_delta,
                ledger_ref,
                error: None,
            }))
        }
        Ok(false) => {
            tracing::warn!(
                user = %request.user_id,
                signature = %request.tx_signature,
                ledger_ref = %ledger_ref,
                "payment verification failed"
            );
            Err(RpcError::VerificationFailed { ledger_ref })
        }
        Err(e) => {
            tracing::error!(
                user = %request.user_id,
                signature = %request.tx_signature,
                ledger_ref = %ledger_ref,
                error = %e,
                "payment verification errored"
            );
            Err(RpcError::Internal {
                reason: e.to_string(),
                ledger_ref,
            })
        }
    }
}

/// `GET /v1/health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
