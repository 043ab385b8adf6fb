use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Expected outcome, not a fault: the account cannot afford the
    /// operation. No mutation was performed.
    #[error("insufficient credits: requested {requested}, available {available} ({operation_id})")]
    InsufficientCredits {
        requested: u32,
        available: i64,
        operation_id: String,
    },

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("storage error: {0}")]
    Storage(#[from] arcana_store::StoreError),
}
