//! The wallet session boundary.

use thiserror::Error;

use arcana_types::WalletAddress;

use crate::signing::SigningResponse;

/// Why a wallet interaction failed, as a structured kind.
///
/// Wallet adapters populate this from whatever their SDK reports. Adapters
/// stuck with bare error strings can use [`WalletFailureKind::classify_message`]
/// as a last resort, but a structured code from the SDK always wins — text
/// sniffing is brittle across wallet implementations and locales.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalletFailureKind {
    /// The user dismissed the prompt.
    Cancelled,
    /// The wallet did not respond in time.
    Timeout,
    /// The wallet refused because the paying account cannot cover the
    /// transfer.
    InsufficientFunds,
    Other,
}

impl WalletFailureKind {
    /// Fallback classifier for adapters whose wallet only surfaces text.
    pub fn classify_message(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("cancel") || lower.contains("reject") {
            WalletFailureKind::Cancelled
        } else if lower.contains("timeout") || lower.contains("timed out") {
            WalletFailureKind::Timeout
        } else if lower.contains("insufficient") {
            WalletFailureKind::InsufficientFunds
        } else {
            WalletFailureKind::Other
        }
    }
}

/// A failed wallet interaction.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct WalletFailure {
    pub kind: WalletFailureKind,
    pub message: String,
}

impl WalletFailure {
    pub fn new(kind: WalletFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build a failure from a bare message, classifying the kind from the
    /// text.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: WalletFailureKind::classify_message(&message),
            message,
        }
    }
}

/// A successful authorization: who pays, and a session token that lets the
/// next purchase skip the connect prompt.
#[derive(Clone, Debug)]
pub struct WalletAuthorization {
    pub address: WalletAddress,
    pub auth_token: String,
}

/// The external wallet app, as the pipeline sees it.
///
/// The transport only accepts base64-encoded transaction bytes — never raw
/// bytes — which is why [`sign_and_send`](WalletSession::sign_and_send)
/// takes the encoded form.
pub trait WalletSession {
    /// Prompt the user to connect and authorize.
    fn authorize(
        &self,
    ) -> impl std::future::Future<Output = Result<WalletAuthorization, WalletFailure>> + Send;

    /// Silently refresh an existing session. Fails if the token expired;
    /// callers fall back to [`authorize`](WalletSession::authorize).
    fn reauthorize(
        &self,
        auth_token: &str,
    ) -> impl std::future::Future<Output = Result<WalletAuthorization, WalletFailure>> + Send;

    /// Submit an encoded transaction for signing and broadcast.
    fn sign_and_send(
        &self,
        tx_base64: &str,
    ) -> impl std::future::Future<Output = Result<SigningResponse, WalletFailure>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_matches_common_phrasings() {
        assert_eq!(
            WalletFailureKind::classify_message("User rejected the request"),
            WalletFailureKind::Cancelled
        );
        assert_eq!(
            WalletFailureKind::classify_message("user cancelled"),
            WalletFailureKind::Cancelled
        );
        assert_eq!(
            WalletFailureKind::classify_message("request timed out"),
            WalletFailureKind::Timeout
        );
        assert_eq!(
            WalletFailureKind::classify_message("Insufficient SOL for transaction"),
            WalletFailureKind::InsufficientFunds
        );
        assert_eq!(
            WalletFailureKind::classify_message("something exploded"),
            WalletFailureKind::Other
        );
    }
}
