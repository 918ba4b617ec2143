use crate::domain::Operation;

use super::OperationFormatter;

const HEADER: &str = "Client ID | OperationType | Amount | Date";

/// Renders an operation history as the fixed pipe-separated statement:
/// the header line first, then one line per operation in the order given
/// by the caller, every line newline-terminated.
pub struct StatementFormatter;

impl OperationFormatter for StatementFormatter {
    fn format(&self, operations: &[Operation], client_id: &str) -> String {
        let mut output = String::from(HEADER);
        output.push('\n');

        for operation in operations {
            output.push_str(&format!(
                "{} | {} | {} | {}\n",
                client_id, operation.kind, operation.amount, operation.date
            ));
        }

        output
    }
}
