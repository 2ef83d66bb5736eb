//! Bank statement import validation.

use rust_decimal::Decimal;

use super::error::ReconciliationError;
use super::types::StatementLineInput;

/// Validates an import batch before anything is written.
///
/// # Errors
///
/// Returns the first problem found: an empty batch id, no lines, or a line
/// with a negative amount, both sides set, or neither side set.
pub fn validate_statement(batch_id: &str, lines: &[StatementLineInput]) -> Result<(), ReconciliationError> {
    if batch_id.trim().is_empty() {
        return Err(ReconciliationError::EmptyBatchId);
    }
    if lines.is_empty() {
        return Err(ReconciliationError::EmptyStatement);
    }

    for (index, line) in lines.iter().enumerate() {
        let invalid = |reason| ReconciliationError::InvalidStatementLine {
            line: index + 1,
            reason,
        };
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(invalid("amounts cannot be negative"));
        }
        if line.debit > Decimal::ZERO && line.credit > Decimal::ZERO {
            return Err(invalid("a line cannot have both debit and credit"));
        }
        if line.debit.is_zero() && line.credit.is_zero() {
            return Err(invalid("a line must have either a debit or a credit"));
        }
    }
    Ok(())
}

/// Net effect of a batch on the bank account balance.
#[must_use]
pub fn batch_net(lines: &[StatementLineInput]) -> Decimal {
    lines.iter().map(|l| l.debit - l.credit).sum()
}
