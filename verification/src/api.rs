//! Wire types for the verify-and-grant endpoint.
//!
//! Shared between the axum route and the client in `arcana-payments`.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/payments/verify-and-grant`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAndGrantRequest {
    pub user_id: String,
    /// Base58 transaction signature.
    pub tx_signature: String,
    pub expected_recipient: String,
    /// Minimum acceptable transfer, in minor units.
    pub expected_amount_min: u64,
    /// Credits the client granted locally; echoed back for audit logging.
    pub credit_delta: u32,
}

/// Response body for `POST /v1/payments/verify-and-grant`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAndGrantResponse {
    pub ok: bool,
    pub granted_credits: u32,
    pub ledger_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
