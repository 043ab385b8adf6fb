//! Axum-based RPC server.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use arcana_chain::ChainRpc;
use arcana_verification::{RetryPolicy, VerificationService};

use crate::handlers::{self, AppState};
use crate::RpcError;

/// The verification HTTP server.
pub struct RpcServer<C> {
    pub port: u16,
    state: Arc<AppState<C>>,
}

impl<C: ChainRpc + Send + Sync + 'static> RpcServer<C> {
    pub fn new(
        port: u16,
        verifier: VerificationService<C>,
        policy: RetryPolicy,
        treasury: arcana_types::WalletAddress,
    ) -> Self {
        Self {
            port,
            state: Arc::new(AppState {
                verifier,
                policy,
                treasury,
            }),
        }
    }

    /// Build the router. Exposed separately so tests can drive it without
    /// binding a socket.
    pub fn router(&self) -> Router {
        Router::new()
            .route(
                "/v1/payments/verify-and-grant",
                post(handlers::verify_and_grant::<C>),
            )
            .route("/v1/health", get(handlers::health))
            // The mobile web shell calls this origin-less; keep CORS open.
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Start the server. This runs until the process is shut down.
    pub async fn start(&self) -> Result<(), RpcError> {
        let addr = format!("0.0.0.0:{}", self.port);
        info!("verification RPC listening on {}", addr);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {addr}: {e}")))?;
        axum::serve(listener, self.router())
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        Ok(())
    }
}
