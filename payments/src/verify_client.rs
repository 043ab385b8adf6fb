//! HTTP client for the verify-and-grant endpoint.

use std::time::Duration;

use arcana_verification::{VerifyAndGrantRequest, VerifyAndGrantResponse};

use crate::VerifyClientError;

/// Client for the server-side verification endpoint.
///
/// Wraps `reqwest::Client` with the backend's base URL. Calls are
/// best-effort: by the time verification runs, the local grant has already
/// happened, so failures here are logged by the caller and never surfaced.
#[derive(Clone)]
pub struct VerifyClient {
    http: reqwest::Client,
    base_url: String,
}

impl VerifyClient {
    /// Create a new client targeting the given base URL
    /// (e.g. `https://api.arcana.app`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, VerifyClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                VerifyClientError::Transport(format!("failed to create HTTP client: {e}"))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the server to independently verify a payment.
    ///
    /// The 400 and 500 responses carry the same body shape as a 200, so
    /// the body is parsed regardless of status.
    pub async fn verify_and_grant(
        &self,
        request: &VerifyAndGrantRequest,
    ) -> Result<VerifyAndGrantResponse, VerifyClientError> {
        let url = format!("{}/v1/payments/verify-and-grant", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| VerifyClientError::Transport(format!("request failed: {e}")))?;

        response
            .json::<VerifyAndGrantResponse>()
            .await
            .map_err(|e| VerifyClientError::InvalidResponse(e.to_string()))
    }
}
