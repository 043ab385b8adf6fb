use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainRpcError {
    /// HTTP 429 or an equivalent "Too Many Requests" RPC error. Must
    /// propagate to callers — it means "couldn't check yet", not "invalid".
    #[error("rate limited by chain RPC")]
    RateLimited,

    #[error("chain RPC transport error: {0}")]
    Transport(String),

    #[error("chain RPC returned an error: {0}")]
    Rpc(String),

    #[error("invalid chain RPC response: {0}")]
    InvalidResponse(String),
}

/// Whether an RPC error message indicates throttling.
///
/// Some providers return a JSON-RPC error body with HTTP 200, so the status
/// code alone is not enough.
pub(crate) fn is_rate_limit_message(message: &str) -> bool {
    message.contains("429") || message.to_ascii_lowercase().contains("too many requests")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_rate_limit_messages() {
        assert!(is_rate_limit_message("HTTP 429"));
        assert!(is_rate_limit_message("Too Many Requests"));
        assert!(is_rate_limit_message("too many requests for this key"));
        assert!(!is_rate_limit_message("transaction not found"));
    }
}
