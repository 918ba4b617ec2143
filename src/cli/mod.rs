use std::fs::File;
use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{
    AccountLedgerStore, LedgerDeps, OperationService, StatementFormatter, SystemClock,
};
use crate::domain::{build_integrity_report, format_amount, parse_amount};
use crate::io::Exporter;
use crate::storage::Repository;

/// Libretto - Bank Account Ledger
#[derive(Parser)]
#[command(name = "libretto")]
#[command(about = "A bank account operations ledger with balances derived from history")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "libretto.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Deposit an amount into a client account
    Deposit {
        /// Client account identifier
        client_id: String,

        /// Amount to deposit (e.g., "50.00" or "50")
        amount: String,
    },

    /// Withdraw an amount from a client account
    Withdraw {
        /// Client account identifier
        client_id: String,

        /// Amount to withdraw (e.g., "50.00" or "50")
        amount: String,
    },

    /// Print a client's operation history, most recent first
    History {
        /// Client account identifier
        client_id: String,
    },

    /// Show balance for one account or all accounts
    Balance {
        /// Client account identifier (omit for all accounts)
        client_id: Option<String>,
    },

    /// Verify ledger integrity
    Check,

    /// Export data to CSV or JSON
    Export {
        /// What to export: operations, balances, full
        export_type: String,

        /// Client account (required for operations export)
        #[arg(short, long)]
        client: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Open a new client account
    Open {
        /// Client account identifier (must be unique)
        client_id: String,
    },

    /// List all accounts
    List,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                Repository::init(&format!("sqlite:{}?mode=rwc", self.database)).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Account(account_cmd) => {
                let repo = open_repository(&self.database).await?;
                run_account_command(&repo, account_cmd).await?;
            }

            Commands::Deposit { client_id, amount } => {
                let repo = open_repository(&self.database).await?;
                let deps = wire(repo);
                let service = OperationService::new(&deps);

                let amount =
                    parse_amount(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let operation = service.deposit(&client_id, amount).await?;

                println!(
                    "Deposited {} into {} (balance: {})",
                    format_amount(operation.amount),
                    client_id,
                    format_amount(operation.balance_after)
                );
            }

            Commands::Withdraw { client_id, amount } => {
                let repo = open_repository(&self.database).await?;
                let deps = wire(repo);
                let service = OperationService::new(&deps);

                let amount =
                    parse_amount(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let operation = service.withdraw(&client_id, amount).await?;

                println!(
                    "Withdrew {} from {} (balance: {})",
                    format_amount(operation.amount),
                    client_id,
                    format_amount(operation.balance_after)
                );
            }

            Commands::History { client_id } => {
                let repo = open_repository(&self.database).await?;
                let deps = wire(repo);
                let service = OperationService::new(&deps);

                let statement = service.print_operations(&client_id).await?;
                print!("{statement}");
            }

            Commands::Balance { client_id } => {
                let repo = open_repository(&self.database).await?;
                let deps = wire(repo);
                let service = OperationService::new(&deps);

                match client_id {
                    Some(client_id) => {
                        let balance = service.balance(&client_id).await?;
                        println!("{}: {}", client_id, format_amount(balance));
                    }
                    None => {
                        let accounts = deps.store.list_accounts().await?;
                        if accounts.is_empty() {
                            println!("No accounts found.");
                        } else {
                            println!("{:<20} {:>12}", "CLIENT", "BALANCE");
                            println!("{}", "-".repeat(32));
                            for account in accounts {
                                let balance = service.balance(&account.client_id).await?;
                                println!(
                                    "{:<20} {:>12}",
                                    account.client_id,
                                    format_amount(balance)
                                );
                            }
                        }
                    }
                }
            }

            Commands::Check => {
                let repo = open_repository(&self.database).await?;
                run_check_command(&repo).await?;
            }

            Commands::Export {
                export_type,
                client,
                output,
            } => {
                let repo = open_repository(&self.database).await?;
                run_export_command(&repo, &export_type, client.as_deref(), output.as_deref())
                    .await?;
            }
        }

        Ok(())
    }
}

async fn open_repository(database_path: &str) -> Result<Repository> {
    Repository::connect(&format!("sqlite:{}", database_path)).await
}

fn wire(repo: Repository) -> LedgerDeps<SystemClock, Repository, StatementFormatter> {
    LedgerDeps {
        clock: SystemClock,
        store: repo,
        formatter: StatementFormatter,
    }
}

async fn run_account_command(repo: &Repository, cmd: AccountCommands) -> Result<()> {
    match cmd {
        AccountCommands::Open { client_id } => {
            let account = repo.open_account(&client_id).await?;
            println!("Opened account: {}", account.client_id);
        }

        AccountCommands::List => {
            let accounts = repo.list_accounts().await?;
            if accounts.is_empty() {
                println!("No accounts found.");
            } else {
                println!("{:<20} {:<20}", "CLIENT", "OPENED");
                println!("{}", "-".repeat(40));
                for account in accounts {
                    println!(
                        "{:<20} {:<20}",
                        account.client_id,
                        account.opened_at.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_check_command(repo: &Repository) -> Result<()> {
    let stats = repo.integrity_stats().await?;

    let mut histories = Vec::new();
    for account in repo.list_accounts().await? {
        let operations = repo.find_all_operations(&account.client_id).await?;
        histories.push((account.client_id, operations));
    }

    let report = build_integrity_report(
        &histories,
        stats.account_count,
        stats.operation_count,
        stats.orphaned_operations,
        stats.invalid_amounts,
    );

    println!("Accounts:   {}", report.account_count);
    println!("Operations: {}", report.operation_count);

    if report.is_valid() {
        println!("Ledger integrity: OK");
        return Ok(());
    }

    if report.orphaned_operations > 0 {
        println!("Orphaned operations: {}", report.orphaned_operations);
    }
    if report.invalid_amounts > 0 {
        println!(
            "Operations with non-positive amounts: {}",
            report.invalid_amounts
        );
    }
    for (client_id, violation) in &report.chain_violations {
        println!(
            "Balance chain broken for {} at operation {}: expected {}, found {}",
            client_id,
            violation.index,
            format_amount(violation.expected),
            format_amount(violation.actual)
        );
    }

    anyhow::bail!("Ledger integrity check failed")
}

async fn run_export_command(
    repo: &Repository,
    export_type: &str,
    client: Option<&str>,
    output: Option<&str>,
) -> Result<()> {
    let exporter = Exporter::new(repo);

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path))?,
        ),
        None => Box::new(std::io::stdout()),
    };

    match export_type {
        "operations" => {
            let client = client.context("--client is required for operations export")?;
            let count = exporter.export_operations_csv(client, &mut writer).await?;
            eprintln!("Exported {} operations", count);
        }

        "balances" => {
            let count = exporter.export_balances_csv(&mut writer).await?;
            eprintln!("Exported {} account balances", count);
        }

        "full" => {
            let snapshot = exporter.export_full_json(&mut writer).await?;
            eprintln!("Exported {} accounts", snapshot.accounts.len());
        }

        other => anyhow::bail!(
            "Unknown export type '{}'. Valid types: operations, balances, full",
            other
        ),
    }

    Ok(())
}
