//! Axum HTTP server for payment verification.
//!
//! Exposes `POST /v1/payments/verify-and-grant` (the advisory server-side
//! check the client fires after granting locally) and `GET /v1/health`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;

pub use config::VerifierConfig;
pub use error::RpcError;
pub use server::RpcServer;
