use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;
use sqlx::{Row, SqlitePool};

use crate::application::{AccountLedgerStore, LedgerError};
use crate::domain::{Account, Operation, OperationKind};

use super::MIGRATION_001_INITIAL;

/// Raw counts for the integrity check, aggregated in SQL so the whole
/// ledger never has to be loaded just to count.
#[derive(Debug, Clone)]
pub struct IntegrityStats {
    pub account_count: i64,
    pub operation_count: i64,
    pub orphaned_operations: i64,
    pub invalid_amounts: i64,
}

/// Sqlite-backed account ledger store: persists accounts and their
/// append-only operation histories.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        debug!("running migration 001_initial");
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Account management
    // ========================

    /// Open a new account for the client. Fails if one already exists.
    pub async fn open_account(&self, client_id: &str) -> Result<Account, LedgerError> {
        if self.account_exists(client_id).await? {
            return Err(LedgerError::AccountAlreadyExists(client_id.to_string()));
        }

        let account = Account::new(client_id);
        sqlx::query("INSERT INTO accounts (client_id, opened_at) VALUES (?, ?)")
            .bind(&account.client_id)
            .bind(account.opened_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .context("Failed to open account")?;

        debug!("opened account {client_id}");
        Ok(account)
    }

    /// List all accounts, ordered by client id.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let rows = sqlx::query(
            "SELECT client_id, opened_at FROM accounts ORDER BY client_id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list accounts")?;

        rows.iter()
            .map(|row| Self::row_to_account(row).map_err(LedgerError::from))
            .collect()
    }

    async fn account_exists(&self, client_id: &str) -> Result<bool, LedgerError> {
        let row = sqlx::query("SELECT 1 FROM accounts WHERE client_id = ?")
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to check account existence")?;
        Ok(row.is_some())
    }

    async fn require_account(&self, client_id: &str) -> Result<(), LedgerError> {
        if self.account_exists(client_id).await? {
            Ok(())
        } else {
            Err(LedgerError::AccountNotFound(client_id.to_string()))
        }
    }

    // ========================
    // Integrity
    // ========================

    /// Get statistics for integrity checking.
    pub async fn integrity_stats(&self) -> Result<IntegrityStats, LedgerError> {
        let account_count: i64 = sqlx::query("SELECT COUNT(*) as count FROM accounts")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count accounts")?
            .get("count");

        let operation_count: i64 = sqlx::query("SELECT COUNT(*) as count FROM operations")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count operations")?
            .get("count");

        let orphaned_operations: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) as count
            FROM operations o
            WHERE NOT EXISTS (SELECT 1 FROM accounts a WHERE a.client_id = o.client_id)
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to count orphaned operations")?
        .get("count");

        let invalid_amounts: i64 = sqlx::query(
            "SELECT COUNT(*) as count FROM operations WHERE CAST(amount AS REAL) <= 0",
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to count invalid amounts")?
        .get("count");

        Ok(IntegrityStats {
            account_count,
            operation_count,
            orphaned_operations,
            invalid_amounts,
        })
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        let opened_at_str: String = row.get("opened_at");

        Ok(Account {
            client_id: row.get("client_id"),
            opened_at: DateTime::parse_from_rfc3339(&opened_at_str)
                .context("Invalid opened_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    fn row_to_operation(row: &sqlx::sqlite::SqliteRow) -> Result<Operation> {
        let date_str: String = row.get("date");
        let kind_str: String = row.get("kind");
        let amount_str: String = row.get("amount");
        let balance_str: String = row.get("balance_after");

        Ok(Operation {
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .context("Invalid operation date")?,
            kind: OperationKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid operation kind: {}", kind_str))?,
            amount: Decimal::from_str(&amount_str).context("Invalid operation amount")?,
            balance_after: Decimal::from_str(&balance_str).context("Invalid balance snapshot")?,
        })
    }
}

#[async_trait]
impl AccountLedgerStore for Repository {
    async fn find_last_operation(
        &self,
        client_id: &str,
    ) -> Result<Option<Operation>, LedgerError> {
        self.require_account(client_id).await?;

        let row = sqlx::query(
            r#"
            SELECT date, kind, amount, balance_after
            FROM operations
            WHERE client_id = ?
            ORDER BY sequence DESC
            LIMIT 1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch last operation")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_operation(&row)?)),
            None => Ok(None),
        }
    }

    async fn append_operation(
        &self,
        client_id: &str,
        operation: &Operation,
    ) -> Result<(), LedgerError> {
        self.require_account(client_id).await?;

        sqlx::query(
            r#"
            INSERT INTO operations (client_id, date, kind, amount, balance_after)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(client_id)
        .bind(operation.date.to_string())
        .bind(operation.kind.as_str())
        .bind(operation.amount.to_string())
        .bind(operation.balance_after.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to append operation")?;

        Ok(())
    }

    async fn find_all_operations(&self, client_id: &str) -> Result<Vec<Operation>, LedgerError> {
        self.require_account(client_id).await?;

        let rows = sqlx::query(
            r#"
            SELECT date, kind, amount, balance_after
            FROM operations
            WHERE client_id = ?
            ORDER BY sequence
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list operations")?;

        rows.iter()
            .map(|row| Self::row_to_operation(row).map_err(LedgerError::from))
            .collect()
    }
}
