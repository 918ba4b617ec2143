use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::AccountLedgerStore;
use crate::domain::{Account, Operation, closing_balance, format_amount};
use crate::storage::Repository;

/// Full-ledger snapshot for JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub accounts: Vec<AccountHistory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountHistory {
    pub account: Account,
    pub operations: Vec<Operation>,
}

/// Exporter for converting ledger data to various formats.
pub struct Exporter<'a> {
    repo: &'a Repository,
}

impl<'a> Exporter<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self { repo }
    }

    /// Export one client's operations to CSV, oldest first.
    pub async fn export_operations_csv<W: Write>(
        &self,
        client_id: &str,
        writer: W,
    ) -> Result<usize> {
        let operations = self.repo.find_all_operations(client_id).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["client_id", "date", "kind", "amount", "balance_after"])?;

        let mut count = 0;
        for operation in &operations {
            csv_writer.write_record([
                client_id.to_string(),
                operation.date.to_string(),
                operation.kind.as_str().to_string(),
                operation.amount.to_string(),
                operation.balance_after.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the closing balance of every account to CSV.
    pub async fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.repo.list_accounts().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["client_id", "balance", "operations"])?;

        let mut count = 0;
        for account in &accounts {
            let operations = self.repo.find_all_operations(&account.client_id).await?;
            csv_writer.write_record([
                account.client_id.clone(),
                format_amount(closing_balance(&operations)),
                operations.len().to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full ledger as a JSON snapshot.
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let mut histories = Vec::new();
        for account in self.repo.list_accounts().await? {
            let operations = self.repo.find_all_operations(&account.client_id).await?;
            histories.push(AccountHistory {
                account,
                operations,
            });
        }

        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            accounts: histories,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
