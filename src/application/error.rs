use thiserror::Error;

use crate::domain::{Amount, ClientId};

/// Every failure an operation can surface. All variants except `Storage`
/// are expected, recoverable-by-caller conditions; none is retried or
/// partially applied.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Cannot credit or debit the account with a non-positive amount: {0}")]
    InvalidAmount(Amount),

    #[error("Insufficient credit to withdraw the amount: {0}")]
    InsufficientCredit(Amount),

    #[error("Unknown account: {0}")]
    AccountNotFound(ClientId),

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(ClientId),

    #[error("Database error: {0}")]
    Storage(#[from] anyhow::Error),
}
