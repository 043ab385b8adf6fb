use thiserror::Error;

use arcana_ledger::LedgerError;

/// Everything a purchase attempt can surface to the UI.
///
/// `Cancelled` and `Timeout` are soft outcomes: the user dismissed the
/// wallet prompt or the network dawdled, and the right response is a
/// gentle "try again", not an alarming failure screen.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment cancelled in the wallet")]
    Cancelled,

    #[error("timed out waiting for the wallet or the chain")]
    Timeout,

    #[error("wallet authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("wallet reports insufficient funds for this payment")]
    InsufficientChainBalance,

    /// The wallet's signing response matched none of the known shapes.
    /// Fatal — guessing at a signature is worse than failing.
    #[error("unrecognized wallet signing response: {0}")]
    MalformedSigningResponse(String),

    #[error("broadcast or confirmation failed: {0}")]
    BroadcastOrConfirmFailed(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl PaymentError {
    /// Whether this outcome should be presented as retry-inviting rather
    /// than as a hard error.
    pub fn is_soft(&self) -> bool {
        matches!(self, PaymentError::Cancelled | PaymentError::Timeout)
    }

    /// A short, non-technical message for the purchase screen.
    pub fn user_message(&self) -> &'static str {
        match self {
            PaymentError::Cancelled => "Payment cancelled — you can try again anytime.",
            PaymentError::Timeout => "The network is taking longer than usual. Try again.",
            PaymentError::InsufficientChainBalance => {
                "Your wallet doesn't have enough funds for this pack."
            }
            PaymentError::AuthorizationFailed(_) => {
                "Couldn't connect to your wallet. Try again."
            }
            _ => "Something went wrong processing the payment.",
        }
    }
}

/// Failures talking to the verify endpoint. These are logged, never shown:
/// by the time verification runs, the purchase already succeeded locally.
#[derive(Debug, Error)]
pub enum VerifyClientError {
    #[error("verify endpoint request failed: {0}")]
    Transport(String),

    #[error("verify endpoint returned an invalid body: {0}")]
    InvalidResponse(String),
}
