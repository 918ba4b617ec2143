mod common;

use anyhow::Result;
use libretto::application::OperationService;
use rust_decimal_macros::dec;

use common::fixed_date_deps;

#[tokio::test]
async fn test_statement_shows_newest_operation_first() -> Result<()> {
    let (deps, _temp) = fixed_date_deps("2023-07-26").await?;
    let service = OperationService::new(&deps);
    deps.store.open_account("client01").await?;

    service.deposit("client01", dec!(100)).await?;
    service.withdraw("client01", dec!(50)).await?;

    let statement = service.print_operations("client01").await?;

    assert_eq!(
        statement,
        "Client ID | OperationType | Amount | Date\n\
         client01 | WITHDRAW | 50 | 2023-07-26\n\
         client01 | DEPOSIT | 100 | 2023-07-26\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_statement_header_appears_exactly_once() -> Result<()> {
    let (deps, _temp) = fixed_date_deps("2024-02-10").await?;
    let service = OperationService::new(&deps);
    deps.store.open_account("client01").await?;

    for _ in 0..3 {
        service.deposit("client01", dec!(10)).await?;
    }

    let statement = service.print_operations("client01").await?;
    let header_count = statement
        .matches("Client ID | OperationType | Amount | Date")
        .count();
    assert_eq!(header_count, 1);
    assert_eq!(statement.lines().count(), 4);

    Ok(())
}

#[tokio::test]
async fn test_statement_for_empty_account_is_header_only() -> Result<()> {
    let (deps, _temp) = fixed_date_deps("2024-02-10").await?;
    let service = OperationService::new(&deps);
    deps.store.open_account("client01").await?;

    let statement = service.print_operations("client01").await?;
    assert_eq!(statement, "Client ID | OperationType | Amount | Date\n");

    Ok(())
}

#[tokio::test]
async fn test_history_runs_newest_to_oldest_regardless_of_store_order() -> Result<()> {
    let (deps, _temp) = fixed_date_deps("2024-02-10").await?;
    let service = OperationService::new(&deps);
    deps.store.open_account("client01").await?;

    service.deposit("client01", dec!(1)).await?;
    service.deposit("client01", dec!(2)).await?;
    service.deposit("client01", dec!(3)).await?;

    let stored = service.list_operations("client01").await?;
    let presented = service.history("client01").await?;

    let stored_amounts: Vec<_> = stored.iter().map(|op| op.amount).collect();
    let presented_amounts: Vec<_> = presented.iter().map(|op| op.amount).collect();

    assert_eq!(stored_amounts, vec![dec!(1), dec!(2), dec!(3)]);
    assert_eq!(presented_amounts, vec![dec!(3), dec!(2), dec!(1)]);

    Ok(())
}

#[tokio::test]
async fn test_statement_preserves_amount_scale() -> Result<()> {
    let (deps, _temp) = fixed_date_deps("2024-02-10").await?;
    let service = OperationService::new(&deps);
    deps.store.open_account("client01").await?;

    service.deposit("client01", dec!(10.50)).await?;

    let statement = service.print_operations("client01").await?;
    assert!(statement.contains("client01 | DEPOSIT | 10.50 | 2024-02-10"));

    Ok(())
}
