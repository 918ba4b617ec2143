mod common;

use anyhow::Result;
use libretto::application::OperationService;
use libretto::io::{Exporter, LedgerSnapshot};
use rust_decimal_macros::dec;

use common::fixed_date_deps;

#[tokio::test]
async fn test_operations_csv_lists_history_oldest_first() -> Result<()> {
    let (deps, _temp) = fixed_date_deps("2024-03-05").await?;
    let service = OperationService::new(&deps);
    deps.store.open_account("client01").await?;

    service.deposit("client01", dec!(100)).await?;
    service.withdraw("client01", dec!(40)).await?;

    let exporter = Exporter::new(&deps.store);
    let mut buffer = Vec::new();
    let count = exporter
        .export_operations_csv("client01", &mut buffer)
        .await?;

    assert_eq!(count, 2);
    let output = String::from_utf8(buffer)?;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "client_id,date,kind,amount,balance_after");
    assert_eq!(lines[1], "client01,2024-03-05,DEPOSIT,100,100");
    assert_eq!(lines[2], "client01,2024-03-05,WITHDRAW,40,60");

    Ok(())
}

#[tokio::test]
async fn test_balances_csv_covers_every_account() -> Result<()> {
    let (deps, _temp) = fixed_date_deps("2024-03-05").await?;
    let service = OperationService::new(&deps);
    deps.store.open_account("alice").await?;
    deps.store.open_account("bob").await?;

    service.deposit("alice", dec!(12.50)).await?;
    service.deposit("bob", dec!(3)).await?;
    service.withdraw("bob", dec!(1)).await?;

    let exporter = Exporter::new(&deps.store);
    let mut buffer = Vec::new();
    let count = exporter.export_balances_csv(&mut buffer).await?;

    assert_eq!(count, 2);
    let output = String::from_utf8(buffer)?;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "client_id,balance,operations");
    assert_eq!(lines[1], "alice,12.5,1");
    assert_eq!(lines[2], "bob,2,2");

    Ok(())
}

#[tokio::test]
async fn test_json_snapshot_round_trips() -> Result<()> {
    let (deps, _temp) = fixed_date_deps("2024-03-05").await?;
    let service = OperationService::new(&deps);
    deps.store.open_account("client01").await?;

    service.deposit("client01", dec!(100)).await?;
    service.withdraw("client01", dec!(25)).await?;

    let exporter = Exporter::new(&deps.store);
    let mut buffer = Vec::new();
    exporter.export_full_json(&mut buffer).await?;

    let parsed: LedgerSnapshot = serde_json::from_slice(&buffer)?;
    assert_eq!(parsed.accounts.len(), 1);

    let history = &parsed.accounts[0];
    assert_eq!(history.account.client_id, "client01");
    assert_eq!(history.operations.len(), 2);
    assert_eq!(history.operations[1].balance_after, dec!(75));

    Ok(())
}
