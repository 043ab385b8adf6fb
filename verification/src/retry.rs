//! Retry policy for verification under rate limiting.

use std::time::Duration;

use arcana_chain::ChainRpc;

use crate::service::{VerificationRequest, VerificationService};
use crate::VerificationError;

/// How the verify endpoint retries the service.
///
/// A `false` verdict may just mean the transaction has not propagated to
/// the RPC node yet, so it is retried with exponential backoff. A rate
/// limit gets a longer wait and does not consume an attempt, but draws on
/// a separate budget so a permanently throttled node cannot loop forever.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub rate_limit_budget: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            rate_limit_budget: 5,
        }
    }
}

impl RetryPolicy {
    /// Wait after attempt `attempt` (1-based) returned `false`.
    fn failure_delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.pow(attempt - 1)
    }

    /// Wait after a rate-limit error during attempt `attempt`.
    fn rate_limit_delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.pow(attempt) * 2
    }
}

/// Run verification under the retry policy.
///
/// Returns `Ok(false)` once every attempt produced a definitive `false`,
/// and `Err(RateLimitBudgetExhausted)` when throttling never let us get an
/// answer — the two must not be conflated, the first is a 400 and the
/// second a 500 at the HTTP layer.
pub async fn verify_with_retry<C: ChainRpc>(
    service: &VerificationService<C>,
    request: &VerificationRequest,
    policy: &RetryPolicy,
) -> Result<bool, VerificationError> {
    let mut rate_limit_budget = policy.rate_limit_budget;
    let mut attempt = 1;

    loop {
        match service.verify(request).await {
            Ok(true) => return Ok(true),
            Ok(false) => {
                if attempt >= policy.max_attempts {
                    tracing::info!(
                        signature = %request.signature,
                        attempts = attempt,
                        "verification failed after all attempts"
                    );
                    return Ok(false);
                }
                let delay = policy.failure_delay(attempt);
                tracing::debug!(
                    signature = %request.signature,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "verification not yet successful, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(VerificationError::RateLimited) => {
                if rate_limit_budget == 0 {
                    tracing::warn!(
                        signature = %request.signature,
                        "rate limit budget exhausted, giving up"
                    );
                    return Err(VerificationError::RateLimitBudgetExhausted);
                }
                rate_limit_budget -= 1;
                let delay = policy.rate_limit_delay(attempt);
                tracing::debug!(
                    signature = %request.signature,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited, waiting before retrying the same attempt"
                );
                tokio::time::sleep(delay).await;
            }
            Err(other) => return Err(other),
        }
    }
}
