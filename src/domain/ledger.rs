use rust_decimal::Decimal;

use super::{Amount, ClientId, Operation};

/// Closing balance of a history: the snapshot of the most recent operation,
/// or zero when no operations exist yet.
pub fn closing_balance(operations: &[Operation]) -> Amount {
    operations
        .last()
        .map(|op| op.balance_after)
        .unwrap_or(Decimal::ZERO)
}

/// Recompute the balance by replaying the signed amounts from zero.
/// For a well-formed history this equals `closing_balance`.
pub fn replay_balance(operations: &[Operation]) -> Amount {
    operations
        .iter()
        .fold(Decimal::ZERO, |balance, op| balance + op.signed_amount())
}

/// A snapshot that disagrees with the running balance implied by the
/// operations before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainViolation {
    /// Zero-based position in the account history
    pub index: usize,
    pub expected: Amount,
    pub actual: Amount,
}

/// Verify the balance chain of one account history: every snapshot must
/// equal the previous snapshot plus or minus the operation amount, with the
/// first operation starting from zero.
pub fn verify_chain(operations: &[Operation]) -> Vec<ChainViolation> {
    let mut violations = Vec::new();
    let mut running = Decimal::ZERO;

    for (index, op) in operations.iter().enumerate() {
        running += op.signed_amount();
        if op.balance_after != running {
            violations.push(ChainViolation {
                index,
                expected: running,
                actual: op.balance_after,
            });
            // Resync on the recorded snapshot so one bad row is reported once
            running = op.balance_after;
        }
    }

    violations
}

/// Result of a full-ledger integrity check.
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    pub account_count: i64,
    pub operation_count: i64,
    /// Operations referencing a client the store has no account for
    pub orphaned_operations: i64,
    /// Stored operations with a non-positive amount
    pub invalid_amounts: i64,
    pub chain_violations: Vec<(ClientId, ChainViolation)>,
}

impl IntegrityReport {
    pub fn is_valid(&self) -> bool {
        self.orphaned_operations == 0
            && self.invalid_amounts == 0
            && self.chain_violations.is_empty()
    }
}

/// Assemble an integrity report from per-account histories and the raw
/// counts the store produced.
pub fn build_integrity_report(
    histories: &[(ClientId, Vec<Operation>)],
    account_count: i64,
    operation_count: i64,
    orphaned_operations: i64,
    invalid_amounts: i64,
) -> IntegrityReport {
    let chain_violations = histories
        .iter()
        .flat_map(|(client_id, operations)| {
            verify_chain(operations)
                .into_iter()
                .map(move |violation| (client_id.clone(), violation))
        })
        .collect();

    IntegrityReport {
        account_count,
        operation_count,
        orphaned_operations,
        invalid_amounts,
        chain_violations,
    }
}
