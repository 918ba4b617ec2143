// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use libretto::application::{Clock, LedgerDeps, StatementFormatter, SystemClock};
use libretto::storage::Repository;
use tempfile::TempDir;

/// Helper to create a sqlite repository backed by a temporary database
pub async fn test_repository() -> Result<(Repository, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let repo =
        Repository::init(&format!("sqlite:{}?mode=rwc", db_path.to_str().unwrap())).await?;
    Ok((repo, temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Clock pinned to a fixed calendar date, for deterministic statements
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Production-style wiring over a temporary database
pub async fn test_deps()
-> Result<(LedgerDeps<SystemClock, Repository, StatementFormatter>, TempDir)> {
    let (repo, temp_dir) = test_repository().await?;
    let deps = LedgerDeps {
        clock: SystemClock,
        store: repo,
        formatter: StatementFormatter,
    };
    Ok((deps, temp_dir))
}

/// Wiring whose clock is pinned to the given date
pub async fn fixed_date_deps(
    date: &str,
) -> Result<(LedgerDeps<FixedClock, Repository, StatementFormatter>, TempDir)> {
    let (repo, temp_dir) = test_repository().await?;
    let deps = LedgerDeps {
        clock: FixedClock(parse_date(date)),
        store: repo,
        formatter: StatementFormatter,
    };
    Ok((deps, temp_dir))
}
