//! Verifier daemon configuration with TOML file support.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use arcana_verification::RetryPolicy;

use crate::RpcError;

/// Configuration for the verification daemon.
///
/// Can be loaded from a TOML file via [`VerifierConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Port the HTTP server listens on.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Chain RPC node URL.
    #[serde(default = "default_chain_rpc_url")]
    pub chain_rpc_url: String,

    /// The treasury address payments must land on. No default — refusing
    /// to start beats verifying against the wrong recipient.
    #[serde(default)]
    pub treasury: String,

    /// Base delay for verification retries, in milliseconds.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Maximum verification attempts per request.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    /// How many rate-limit waits a single request may burn.
    #[serde(default = "default_rate_limit_budget")]
    pub rate_limit_budget: u32,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_rpc_port() -> u16 {
    8787
}

fn default_chain_rpc_url() -> String {
    "http://127.0.0.1:8899".to_string()
}

fn default_retry_base_delay_ms() -> u64 {
    500
}

fn default_retry_max_attempts() -> u32 {
    5
}

fn default_rate_limit_budget() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl VerifierConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, RpcError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RpcError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, RpcError> {
        toml::from_str(s).map_err(|e| RpcError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("VerifierConfig is always serializable to TOML")
    }

    /// The retry policy this configuration describes.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            rate_limit_budget: self.rate_limit_budget,
        }
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            rpc_port: default_rpc_port(),
            chain_rpc_url: default_chain_rpc_url(),
            treasury: String::new(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            rate_limit_budget: default_rate_limit_budget(),
            log_level: default_log_level(),
        }
    }
}
