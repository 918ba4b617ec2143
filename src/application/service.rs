use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::domain::{Amount, ClientId, Operation};

use super::{AccountLedgerStore, Clock, LedgerError, OperationFormatter};

/// The three collaborators the operation service depends on. Built once at
/// process wiring time and passed by reference into the service; nothing
/// here is a global.
pub struct LedgerDeps<C, S, F> {
    pub clock: C,
    pub store: S,
    pub formatter: F,
}

/// Application service enforcing the deposit/withdraw business rules and
/// producing correctly ordered, correctly formatted operation history.
/// This is the primary interface for any host (CLI, API, TUI, etc.).
pub struct OperationService<'a, C, S, F> {
    deps: &'a LedgerDeps<C, S, F>,
    /// One mutex per client: the read-balance-then-append section of a
    /// mutating call must not interleave with another mutation on the same
    /// client. Reads take no lock.
    locks: Mutex<HashMap<ClientId, Arc<Mutex<()>>>>,
}

impl<'a, C, S, F> OperationService<'a, C, S, F>
where
    C: Clock,
    S: AccountLedgerStore,
    F: OperationFormatter,
{
    pub fn new(deps: &'a LedgerDeps<C, S, F>) -> Self {
        Self {
            deps,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Record a deposit and return the stored operation.
    ///
    /// The amount must be strictly positive; otherwise the call fails with
    /// `InvalidAmount` before the store is touched. An unknown client
    /// surfaces the store's `AccountNotFound` unchanged.
    pub async fn deposit(&self, client_id: &str, amount: Amount) -> Result<Operation, LedgerError> {
        check_amount(amount)?;

        let lock = self.client_lock(client_id).await;
        let _guard = lock.lock().await;

        let balance = self.current_balance(client_id).await?;
        let operation = Operation::deposit(self.deps.clock.today(), amount, balance);
        self.deps
            .store
            .append_operation(client_id, &operation)
            .await?;

        Ok(operation)
    }

    /// Record a withdrawal and return the stored operation.
    ///
    /// Same positivity rule as `deposit`. The withdrawal is permitted only
    /// when the amount does not exceed the current balance - draining the
    /// account to exactly zero is valid. A larger amount fails with
    /// `InsufficientCredit` and writes nothing.
    pub async fn withdraw(
        &self,
        client_id: &str,
        amount: Amount,
    ) -> Result<Operation, LedgerError> {
        check_amount(amount)?;

        let lock = self.client_lock(client_id).await;
        let _guard = lock.lock().await;

        let balance = self.current_balance(client_id).await?;
        if amount > balance {
            return Err(LedgerError::InsufficientCredit(amount));
        }

        let operation = Operation::withdraw(self.deps.clock.today(), amount, balance);
        self.deps
            .store
            .append_operation(client_id, &operation)
            .await?;

        Ok(operation)
    }

    /// Render the client's full history in the fixed statement format,
    /// most recent operation first.
    pub async fn print_operations(&self, client_id: &str) -> Result<String, LedgerError> {
        let operations = self.history(client_id).await?;
        Ok(self.deps.formatter.format(&operations, client_id))
    }

    /// Current balance: the snapshot of the most recent operation, or zero
    /// for an account with no history yet.
    pub async fn balance(&self, client_id: &str) -> Result<Amount, LedgerError> {
        self.current_balance(client_id).await
    }

    /// Full history, most recent first (presentation order).
    pub async fn history(&self, client_id: &str) -> Result<Vec<Operation>, LedgerError> {
        let mut operations = self.deps.store.find_all_operations(client_id).await?;
        operations.reverse();
        Ok(operations)
    }

    /// Full history in insertion order (oldest first), as stored.
    pub async fn list_operations(&self, client_id: &str) -> Result<Vec<Operation>, LedgerError> {
        self.deps.store.find_all_operations(client_id).await
    }

    async fn current_balance(&self, client_id: &str) -> Result<Amount, LedgerError> {
        let last = self.deps.store.find_last_operation(client_id).await?;
        Ok(last.map(|op| op.balance_after).unwrap_or(Decimal::ZERO))
    }

    async fn client_lock(&self, client_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(client_id.to_string()).or_default().clone()
    }
}

fn check_amount(amount: Amount) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(())
}
