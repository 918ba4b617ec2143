use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::domain::Operation;

use super::LedgerError;

/// Supplies the calendar date new operations are stamped with. Called once
/// per mutating operation.
pub trait Clock: Send + Sync {
    /// Current calendar date in UTC.
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Persistence port for per-client operation histories. The store owns
/// account existence: every method fails with `AccountNotFound` for a
/// client it does not know, and the service never opens or deletes
/// accounts through it. An appended operation must be visible to all
/// subsequent reads for the same client.
#[async_trait]
pub trait AccountLedgerStore: Send + Sync {
    /// Most recent operation for the client, or `None` for an account with
    /// no history yet.
    async fn find_last_operation(&self, client_id: &str)
    -> Result<Option<Operation>, LedgerError>;

    /// Durably append one operation to the end of the client's history.
    async fn append_operation(
        &self,
        client_id: &str,
        operation: &Operation,
    ) -> Result<(), LedgerError>;

    /// Full history for the client, oldest first (insertion order).
    async fn find_all_operations(&self, client_id: &str) -> Result<Vec<Operation>, LedgerError>;
}

/// Renders an operation sequence into display text, in the order given by
/// the caller.
pub trait OperationFormatter: Send + Sync {
    fn format(&self, operations: &[Operation], client_id: &str) -> String;
}
