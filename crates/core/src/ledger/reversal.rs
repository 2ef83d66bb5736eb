//! Mirror entries for reversing posted journal entries.

use super::types::{JournalEntryType, JournalLineInput, PreparedLine};

/// The entry that offsets a posted original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversalDraft {
    /// Always `Adjustment`.
    pub entry_type: JournalEntryType,
    /// Description referencing the original.
    pub description: String,
    /// Reference carried over to the mirror: the original's number.
    pub reference: String,
    /// Original lines with debit and credit swapped, in the same order.
    pub lines: Vec<JournalLineInput>,
}

/// Builds the mirror of `original_lines`, swapping every debit and credit.
#[must_use]
pub fn build_reversal(
    original_number: &str,
    original_lines: &[PreparedLine],
    reason: Option<&str>,
) -> ReversalDraft {
    let description = match reason.map(str::trim).filter(|r| !r.is_empty()) {
        Some(reason) => format!("Reversal of {original_number}: {reason}"),
        None => format!("Reversal of {original_number}"),
    };

    let mut ordered: Vec<&PreparedLine> = original_lines.iter().collect();
    ordered.sort_by_key(|l| l.line_number);

    let lines = ordered
        .into_iter()
        .map(|line| JournalLineInput {
            account_id: line.account_id,
            debit: line.credit,
            credit: line.debit,
            description: line.description.clone(),
        })
        .collect();

    ReversalDraft {
        entry_type: JournalEntryType::Adjustment,
        description,
        reference: original_number.to_string(),
        lines,
    }
}
