use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Amount;

/// Client account identifier, supplied by the caller (account number).
pub type ClientId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    /// Credit to the account; increases the balance.
    Deposit,
    /// Debit from the account; decreases the balance.
    Withdraw,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Deposit => "DEPOSIT",
            OperationKind::Withdraw => "WITHDRAW",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DEPOSIT" => Some(OperationKind::Deposit),
            "WITHDRAW" => Some(OperationKind::Withdraw),
            _ => None,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One deposit or withdrawal against a client account.
/// Operations are immutable - once appended to an account's history they are
/// never updated or deleted, and the balance is always derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Calendar date (UTC) the operation was recorded on
    pub date: NaiveDate,
    /// Amount moved, always positive; the sign is implied by `kind`
    pub amount: Amount,
    pub kind: OperationKind,
    /// Account balance immediately after this operation was applied -
    /// a snapshot, not a delta
    pub balance_after: Amount,
}

impl Operation {
    pub fn new(date: NaiveDate, amount: Amount, kind: OperationKind, balance_after: Amount) -> Self {
        assert!(amount > Decimal::ZERO, "Operation amount must be positive");
        Self {
            date,
            amount,
            kind,
            balance_after,
        }
    }

    /// Build the deposit that extends a history whose closing balance is
    /// `previous_balance`.
    pub fn deposit(date: NaiveDate, amount: Amount, previous_balance: Amount) -> Self {
        Self::new(date, amount, OperationKind::Deposit, previous_balance + amount)
    }

    /// Build the withdrawal that extends a history whose closing balance is
    /// `previous_balance`. The caller is responsible for checking the
    /// balance covers the amount.
    pub fn withdraw(date: NaiveDate, amount: Amount, previous_balance: Amount) -> Self {
        Self::new(date, amount, OperationKind::Withdraw, previous_balance - amount)
    }

    /// Amount signed by kind: positive for deposits, negative for
    /// withdrawals. Used when replaying a history from zero.
    pub fn signed_amount(&self) -> Amount {
        match self.kind {
            OperationKind::Deposit => self.amount,
            OperationKind::Withdraw => -self.amount,
        }
    }
}
