//! Server-side payment verification.
//!
//! The client grants credits locally as soon as a payment confirms; this
//! crate is the independent check the server runs against chain state. The
//! result is advisory — a failed verification is reported and logged, never
//! used to claw back an already-granted local credit.

pub mod api;
pub mod error;
pub mod retry;
pub mod service;

pub use api::{VerifyAndGrantRequest, VerifyAndGrantResponse};
pub use error::VerificationError;
pub use retry::{verify_with_retry, RetryPolicy};
pub use service::{VerificationRequest, VerificationService};
