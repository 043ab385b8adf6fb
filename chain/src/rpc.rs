//! The chain RPC trait and the records it returns.

use crate::ChainRpcError;
use arcana_types::TxSignature;
use serde::Deserialize;

/// Status of a broadcast transaction at "confirmed" commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationStatus {
    /// Whether the cluster has confirmed the transaction.
    pub confirmed: bool,
    /// On-chain execution error, if any. A confirmed transaction can still
    /// have failed — having a signature does not imply success.
    pub execution_error: Option<String>,
}

/// A fetched transaction with the balance movements needed for
/// verification.
///
/// `account_keys` merges the static key list with any loaded addresses, so
/// legacy and versioned transactions present the same way; indices line up
/// with `pre_balances`/`post_balances`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRecord {
    pub execution_error: Option<String>,
    pub account_keys: Vec<String>,
    pub pre_balances: Vec<u64>,
    pub post_balances: Vec<u64>,
}

impl TransactionRecord {
    /// How many minor units the given account gained in this transaction,
    /// or `None` if the account does not appear in the key list.
    pub fn recipient_delta(&self, recipient: &str) -> Option<i128> {
        let idx = self.account_keys.iter().position(|k| k == recipient)?;
        let pre = *self.pre_balances.get(idx)? as i128;
        let post = *self.post_balances.get(idx)? as i128;
        Some(post - pre)
    }
}

/// One account key as it appears in an RPC response: a bare string in the
/// legacy `json` encoding, an object carrying `pubkey` in `jsonParsed`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum AccountKey {
    Plain(String),
    Tagged { pubkey: String },
}

impl AccountKey {
    pub fn into_string(self) -> String {
        match self {
            AccountKey::Plain(s) => s,
            AccountKey::Tagged { pubkey } => pubkey,
        }
    }
}

/// Chain access used by the payment pipeline and the verification service.
pub trait ChainRpc {
    /// The latest finalized blockhash, for stamping new transactions.
    fn latest_blockhash(&self)
        -> impl std::future::Future<Output = Result<String, ChainRpcError>> + Send;

    /// Probe the status of a broadcast transaction once. Callers own the
    /// poll loop.
    fn confirm_transaction(
        &self,
        signature: &TxSignature,
    ) -> impl std::future::Future<Output = Result<ConfirmationStatus, ChainRpcError>> + Send;

    /// Fetch a transaction at "confirmed" commitment, or `None` if the
    /// cluster does not know the signature.
    fn fetch_transaction(
        &self,
        signature: &TxSignature,
    ) -> impl std::future::Future<Output = Result<Option<TransactionRecord>, ChainRpcError>> + Send;
}

impl<T: ChainRpc + Sync> ChainRpc for &T {
    async fn latest_blockhash(&self) -> Result<String, ChainRpcError> {
        (**self).latest_blockhash().await
    }

    async fn confirm_transaction(
        &self,
        signature: &TxSignature,
    ) -> Result<ConfirmationStatus, ChainRpcError> {
        (**self).confirm_transaction(signature).await
    }

    async fn fetch_transaction(
        &self,
        signature: &TxSignature,
    ) -> Result<Option<TransactionRecord>, ChainRpcError> {
        (**self).fetch_transaction(signature).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TransactionRecord {
        TransactionRecord {
            execution_error: None,
            account_keys: vec!["payer".into(), "treasury".into(), "program".into()],
            pre_balances: vec![50_000_000, 1_000, 1],
            post_balances: vec![39_994_000, 10_001_000, 1],
        }
    }

    #[test]
    fn recipient_delta_is_post_minus_pre() {
        assert_eq!(record().recipient_delta("treasury"), Some(10_000_000));
    }

    #[test]
    fn recipient_delta_missing_account() {
        assert_eq!(record().recipient_delta("stranger"), None);
    }

    #[test]
    fn recipient_delta_can_be_negative() {
        // The payer index loses the transfer amount plus fees.
        assert_eq!(record().recipient_delta("payer"), Some(-10_006_000));
    }

    #[test]
    fn account_key_parses_both_shapes() {
        let plain: AccountKey = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(plain.into_string(), "abc");

        let tagged: AccountKey =
            serde_json::from_str(r#"{"pubkey":"def","signer":true,"writable":false}"#).unwrap();
        assert_eq!(tagged.into_string(), "def");
    }
}
