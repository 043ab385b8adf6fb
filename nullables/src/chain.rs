//! Nullable chain RPC — scripted responses for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use arcana_chain::{ChainRpc, ChainRpcError, ConfirmationStatus, TransactionRecord};
use arcana_types::TxSignature;

/// A scripted chain RPC for testing.
///
/// Tests register transactions by signature, queue rate-limit responses,
/// and control how many confirmation probes report "not yet".
pub struct NullChainRpc {
    blockhash: Mutex<String>,
    transactions: Mutex<HashMap<String, TransactionRecord>>,
    /// Number of upcoming `fetch_transaction` calls that fail rate-limited.
    rate_limited_fetches: Mutex<u32>,
    /// Number of confirmation probes that report unconfirmed before the
    /// transaction confirms.
    unconfirmed_probes: Mutex<u32>,
    /// Execution error reported once the transaction confirms.
    confirm_execution_error: Mutex<Option<String>>,
    fetch_calls: Mutex<u32>,
}

impl NullChainRpc {
    pub fn new() -> Self {
        Self {
            blockhash: Mutex::new("NuLLB1ockhash1111111111111111111".to_string()),
            transactions: Mutex::new(HashMap::new()),
            rate_limited_fetches: Mutex::new(0),
            unconfirmed_probes: Mutex::new(0),
            confirm_execution_error: Mutex::new(None),
            fetch_calls: Mutex::new(0),
        }
    }

    /// Register a fetchable transaction under a signature.
    pub fn with_transaction(self, signature: &str, record: TransactionRecord) -> Self {
        self.transactions
            .lock()
            .unwrap()
            .insert(signature.to_string(), record);
        self
    }

    /// The next `count` fetches fail with `RateLimited`.
    pub fn rate_limit_next_fetches(&self, count: u32) {
        *self.rate_limited_fetches.lock().unwrap() = count;
    }

    /// The next `count` confirmation probes report unconfirmed.
    pub fn delay_confirmation(&self, count: u32) {
        *self.unconfirmed_probes.lock().unwrap() = count;
    }

    /// Confirmed transactions report this on-chain execution error.
    pub fn fail_execution(&self, error: impl Into<String>) {
        *self.confirm_execution_error.lock().unwrap() = Some(error.into());
    }

    /// How many times `fetch_transaction` was called.
    pub fn fetch_calls(&self) -> u32 {
        *self.fetch_calls.lock().unwrap()
    }
}

impl Default for NullChainRpc {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainRpc for NullChainRpc {
    async fn latest_blockhash(&self) -> Result<String, ChainRpcError> {
        Ok(self.blockhash.lock().unwrap().clone())
    }

    async fn confirm_transaction(
        &self,
        _signature: &TxSignature,
    ) -> Result<ConfirmationStatus, ChainRpcError> {
        let mut pending = self.unconfirmed_probes.lock().unwrap();
        if *pending > 0 {
            *pending -= 1;
            return Ok(ConfirmationStatus {
                confirmed: false,
                execution_error: None,
            });
        }
        Ok(ConfirmationStatus {
            confirmed: true,
            execution_error: self.confirm_execution_error.lock().unwrap().clone(),
        })
    }

    async fn fetch_transaction(
        &self,
        signature: &TxSignature,
    ) -> Result<Option<TransactionRecord>, ChainRpcError> {
        *self.fetch_calls.lock().unwrap() += 1;
        let mut limited = self.rate_limited_fetches.lock().unwrap();
        if *limited > 0 {
            *limited -= 1;
            return Err(ChainRpcError::RateLimited);
        }
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .get(signature.as_str())
            .cloned())
    }
}
