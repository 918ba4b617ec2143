use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ClientId;

/// A client account as the store tracks it. Accounts are opened and listed
/// by the store; the operation service only ever appends to them. There is
/// no balance field - the balance is derived from the operation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub client_id: ClientId,
    pub opened_at: DateTime<Utc>,
}

impl Account {
    pub fn new(client_id: impl Into<ClientId>) -> Self {
        Self {
            client_id: client_id.into(),
            opened_at: Utc::now(),
        }
    }
}
