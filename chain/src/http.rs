//! JSON-RPC 2.0 chain client over HTTP.

use std::time::Duration;

use serde::Deserialize;

use arcana_types::TxSignature;

use crate::error::is_rate_limit_message;
use crate::rpc::{AccountKey, ChainRpc, ConfirmationStatus, TransactionRecord};
use crate::ChainRpcError;

/// HTTP client for a chain RPC node.
///
/// Wraps `reqwest::Client` with the node's base URL and provides typed
/// methods for each RPC call the payment subsystem needs.
#[derive(Clone)]
pub struct HttpChainRpc {
    http: reqwest::Client,
    rpc_url: String,
}

impl HttpChainRpc {
    /// Create a new client targeting the given RPC URL.
    pub fn new(rpc_url: impl Into<String>) -> Result<Self, ChainRpcError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ChainRpcError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            rpc_url: rpc_url.into(),
        })
    }

    /// The configured RPC URL.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Send a JSON-RPC request and return the `result` field.
    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ChainRpcError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainRpcError::Transport(format!("request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ChainRpcError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(ChainRpcError::Transport(format!(
                "chain RPC returned HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChainRpcError::InvalidResponse(format!("invalid JSON response: {e}")))?;

        if let Some(err) = json.get("error") {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown RPC error")
                .to_string();
            if is_rate_limit_message(&message) {
                return Err(ChainRpcError::RateLimited);
            }
            return Err(ChainRpcError::Rpc(message));
        }

        json.get("result")
            .cloned()
            .ok_or_else(|| ChainRpcError::InvalidResponse("missing result field".to_string()))
    }
}

// ── Response shapes ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct BlockhashResult {
    value: BlockhashValue,
}

#[derive(Deserialize)]
struct BlockhashValue {
    blockhash: String,
}

#[derive(Deserialize)]
struct SignatureStatusesResult {
    value: Vec<Option<SignatureStatus>>,
}

#[derive(Deserialize)]
struct SignatureStatus {
    #[serde(rename = "confirmationStatus")]
    confirmation_status: Option<String>,
    err: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct RpcTransaction {
    meta: Option<RpcMeta>,
    transaction: RpcTransactionBody,
}

#[derive(Deserialize)]
struct RpcMeta {
    err: Option<serde_json::Value>,
    #[serde(rename = "preBalances", default)]
    pre_balances: Vec<u64>,
    #[serde(rename = "postBalances", default)]
    post_balances: Vec<u64>,
    #[serde(rename = "loadedAddresses", default)]
    loaded_addresses: Option<LoadedAddresses>,
}

#[derive(Deserialize, Default)]
struct LoadedAddresses {
    #[serde(default)]
    writable: Vec<String>,
    #[serde(default)]
    readonly: Vec<String>,
}

#[derive(Deserialize)]
struct RpcTransactionBody {
    message: RpcMessage,
}

#[derive(Deserialize)]
struct RpcMessage {
    #[serde(rename = "accountKeys")]
    account_keys: Vec<AccountKey>,
}

impl ChainRpc for HttpChainRpc {
    async fn latest_blockhash(&self) -> Result<String, ChainRpcError> {
        let result = self
            .rpc_call(
                "getLatestBlockhash",
                serde_json::json!([{ "commitment": "finalized" }]),
            )
            .await?;
        let parsed: BlockhashResult = serde_json::from_value(result)
            .map_err(|e| ChainRpcError::InvalidResponse(format!("invalid blockhash: {e}")))?;
        Ok(parsed.value.blockhash)
    }

    async fn confirm_transaction(
        &self,
        signature: &TxSignature,
    ) -> Result<ConfirmationStatus, ChainRpcError> {
        let result = self
            .rpc_call(
                "getSignatureStatuses",
                serde_json::json!([[signature.as_str()], { "searchTransactionHistory": true }]),
            )
            .await?;
        let parsed: SignatureStatusesResult = serde_json::from_value(result).map_err(|e| {
            ChainRpcError::InvalidResponse(format!("invalid signature status: {e}"))
        })?;

        match parsed.value.into_iter().next().flatten() {
            Some(status) => {
                let confirmed = matches!(
                    status.confirmation_status.as_deref(),
                    Some("confirmed") | Some("finalized")
                );
                Ok(ConfirmationStatus {
                    confirmed,
                    execution_error: status.err.map(|e| e.to_string()),
                })
            }
            None => Ok(ConfirmationStatus {
                confirmed: false,
                execution_error: None,
            }),
        }
    }

    async fn fetch_transaction(
        &self,
        signature: &TxSignature,
    ) -> Result<Option<TransactionRecord>, ChainRpcError> {
        let result = self
            .rpc_call(
                "getTransaction",
                serde_json::json!([signature.as_str(), {
                    "encoding": "json",
                    "commitment": "confirmed",
                    "maxSupportedTransactionVersion": 0,
                }]),
            )
            .await?;

        if result.is_null() {
            return Ok(None);
        }

        let parsed: RpcTransaction = serde_json::from_value(result)
            .map_err(|e| ChainRpcError::InvalidResponse(format!("invalid transaction: {e}")))?;

        let meta = parsed.meta.ok_or_else(|| {
            ChainRpcError::InvalidResponse("transaction has no meta".to_string())
        })?;

        let mut account_keys: Vec<String> = parsed
            .transaction
            .message
            .account_keys
            .into_iter()
            .map(AccountKey::into_string)
            .collect();
        if let Some(loaded) = meta.loaded_addresses {
            account_keys.extend(loaded.writable);
            account_keys.extend(loaded.readonly);
        }

        Ok(Some(TransactionRecord {
            execution_error: meta.err.map(|e| e.to_string()),
            account_keys,
            pre_balances: meta.pre_balances,
            post_balances: meta.post_balances,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_response_merges_loaded_addresses() {
        let raw = serde_json::json!({
            "meta": {
                "err": null,
                "preBalances": [100, 0],
                "postBalances": [89, 10],
                "loadedAddresses": { "writable": ["w1"], "readonly": ["r1"] }
            },
            "transaction": {
                "message": { "accountKeys": ["payer", "treasury"] }
            }
        });
        let parsed: RpcTransaction = serde_json::from_value(raw).unwrap();
        let meta = parsed.meta.unwrap();
        let mut keys: Vec<String> = parsed
            .transaction
            .message
            .account_keys
            .into_iter()
            .map(AccountKey::into_string)
            .collect();
        let loaded = meta.loaded_addresses.unwrap();
        keys.extend(loaded.writable);
        keys.extend(loaded.readonly);
        assert_eq!(keys, vec!["payer", "treasury", "w1", "r1"]);
    }

    #[test]
    fn versioned_account_keys_parse() {
        let raw = serde_json::json!({
            "meta": { "err": null, "preBalances": [], "postBalances": [] },
            "transaction": {
                "message": {
                    "accountKeys": [
                        { "pubkey": "abc", "signer": true, "writable": true },
                        "def"
                    ]
                }
            }
        });
        let parsed: RpcTransaction = serde_json::from_value(raw).unwrap();
        let keys: Vec<String> = parsed
            .transaction
            .message
            .account_keys
            .into_iter()
            .map(AccountKey::into_string)
            .collect();
        assert_eq!(keys, vec!["abc", "def"]);
    }
}
