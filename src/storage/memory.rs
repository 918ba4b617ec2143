use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::{AccountLedgerStore, LedgerError};
use crate::domain::{ClientId, Operation};

/// In-memory reference store: a map from client id to that client's
/// ordered operation history. The RwLock keeps appends atomic while
/// letting reads run concurrently, so a reader never observes a partially
/// appended operation. Intended for tests and ephemeral wiring; the
/// sqlite `Repository` is the durable store.
pub struct InMemoryStore {
    accounts: RwLock<HashMap<ClientId, Vec<Operation>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Open a new account for the client. Fails if one already exists.
    pub async fn open_account(&self, client_id: &str) -> Result<(), LedgerError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(client_id) {
            return Err(LedgerError::AccountAlreadyExists(client_id.to_string()));
        }
        accounts.insert(client_id.to_string(), Vec::new());
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountLedgerStore for InMemoryStore {
    async fn find_last_operation(
        &self,
        client_id: &str,
    ) -> Result<Option<Operation>, LedgerError> {
        let accounts = self.accounts.read().await;
        let operations = accounts
            .get(client_id)
            .ok_or_else(|| LedgerError::AccountNotFound(client_id.to_string()))?;
        Ok(operations.last().cloned())
    }

    async fn append_operation(
        &self,
        client_id: &str,
        operation: &Operation,
    ) -> Result<(), LedgerError> {
        let mut accounts = self.accounts.write().await;
        let operations = accounts
            .get_mut(client_id)
            .ok_or_else(|| LedgerError::AccountNotFound(client_id.to_string()))?;
        operations.push(operation.clone());
        Ok(())
    }

    async fn find_all_operations(&self, client_id: &str) -> Result<Vec<Operation>, LedgerError> {
        let accounts = self.accounts.read().await;
        let operations = accounts
            .get(client_id)
            .ok_or_else(|| LedgerError::AccountNotFound(client_id.to_string()))?;
        Ok(operations.clone())
    }
}
