//! Chain RPC access for payment settlement.
//!
//! The payment pipeline and the verification service both talk to the chain
//! through the [`ChainRpc`] trait; [`HttpChainRpc`] implements it over
//! JSON-RPC 2.0. Rate limiting is surfaced as a distinct error variant so
//! callers can tell "couldn't check yet" apart from a definitive answer.

pub mod error;
pub mod http;
pub mod rpc;

pub use error::ChainRpcError;
pub use http::HttpChainRpc;
pub use rpc::{ChainRpc, ConfirmationStatus, TransactionRecord};
