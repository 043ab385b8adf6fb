use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    /// The chain RPC throttled us. Distinct from a definitive "invalid":
    /// the caller should retry rather than reject the payment.
    #[error("chain RPC rate limited")]
    RateLimited,

    /// The retry policy ran out of rate-limit waits without ever getting
    /// an answer from the chain.
    #[error("rate limit retry budget exhausted")]
    RateLimitBudgetExhausted,
}
