//! RPC error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use arcana_verification::VerifyAndGrantResponse;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String, ledger_ref: String },

    /// The chain says the claimed payment does not check out.
    #[error("verification failed")]
    VerificationFailed { ledger_ref: String },

    /// Could not get an answer at all (e.g. the rate-limit budget ran
    /// out). Distinct from `VerificationFailed` — the client may retry.
    #[error("internal error: {reason}")]
    Internal { reason: String, ledger_ref: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Server(String),
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let (status, ledger_ref, error) = match self {
            RpcError::InvalidRequest { reason, ledger_ref } => {
                (StatusCode::BAD_REQUEST, ledger_ref, reason)
            }
            RpcError::VerificationFailed { ledger_ref } => (
                StatusCode::BAD_REQUEST,
                ledger_ref,
                "verification failed".to_string(),
            ),
            RpcError::Internal { reason, ledger_ref } => {
                (StatusCode::INTERNAL_SERVER_ERROR, ledger_ref, reason)
            }
            RpcError::Config(reason) | RpcError::Server(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::new(),
                reason,
            ),
        };

        let body = VerifyAndGrantResponse {
            ok: false,
            granted_credits: 0,
            ledger_ref,
            error: Some(error),
        };
        (status, Json(body)).into_response()
    }
}
