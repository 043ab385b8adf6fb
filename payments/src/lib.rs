//! Client-side payment pipeline.
//!
//! Drives one credit-pack purchase from wallet authorization through
//! transaction build, signing, broadcast, and confirmation, then grants the
//! credits locally and fires a best-effort server verification. A failed
//! attempt terminates the pipeline; the caller restarts from idle.

pub mod catalog;
pub mod error;
pub mod pipeline;
pub mod signing;
pub mod tx;
pub mod verify_client;
pub mod wallet;

pub use catalog::{pack_for_credits, CREDIT_PACKS};
pub use error::{PaymentError, VerifyClientError};
pub use pipeline::{PaymentPhase, PaymentPipeline, PaymentReceipt};
pub use signing::{normalize_signature, SigningResponse};
pub use tx::TransferDraft;
pub use verify_client::VerifyClient;
pub use wallet::{WalletAuthorization, WalletFailure, WalletFailureKind, WalletSession};
