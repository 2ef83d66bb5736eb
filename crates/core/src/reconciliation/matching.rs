//! Matching bank transactions to journal entries.

use std::collections::{HashMap, HashSet};
use std::hash::BuildHasher;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::ReconciliationError;
use super::types::{BankLine, MatchCandidate, MatchSettings, MatchSuggestion, ReconciliationStatus};

/// A transaction can be matched inside an open reconciliation, once.
pub fn ensure_can_match(
    reconciliation_id: Uuid,
    status: ReconciliationStatus,
    transaction: &BankLine,
) -> Result<(), ReconciliationError> {
    if status == ReconciliationStatus::Completed {
        return Err(ReconciliationError::ReconciliationCompleted(reconciliation_id));
    }
    if transaction.is_reconciled {
        return Err(ReconciliationError::AlreadyReconciled(transaction.id));
    }
    Ok(())
}

/// Unmatching is blocked once the reconciliation is completed.
pub fn ensure_can_unmatch(
    reconciliation_id: Uuid,
    status: ReconciliationStatus,
    transaction: &BankLine,
) -> Result<(), ReconciliationError> {
    if status == ReconciliationStatus::Completed {
        return Err(ReconciliationError::ReconciliationCompleted(reconciliation_id));
    }
    if !transaction.is_reconciled {
        return Err(ReconciliationError::NotReconciled(transaction.id));
    }
    Ok(())
}

/// Ranks journal entries that plausibly correspond to `transaction`.
///
/// Bank debits are compared with debit lines on the GL account and bank
/// credits with credit lines. A line qualifies when its entry is dated within
/// `settings.window_days` of the transaction and its amount is within
/// `settings.tolerance_percent` of the bank amount; each entry is reported
/// once, through its closest line. Entries in `excluded` (already matched
/// elsewhere) are skipped. Results are ordered by amount difference, then
/// days apart, then entry number.
#[must_use]
pub fn suggest_matches<S: BuildHasher>(
    transaction: &BankLine,
    candidates: &[MatchCandidate],
    settings: &MatchSettings,
    excluded: &HashSet<Uuid, S>,
) -> Vec<MatchSuggestion> {
    let bank_is_debit = transaction.debit > Decimal::ZERO;
    let bank_amount = if bank_is_debit {
        transaction.debit
    } else {
        transaction.credit
    };
    let tolerance = bank_amount * Decimal::from(settings.tolerance_percent) / Decimal::ONE_HUNDRED;

    let mut best: HashMap<Uuid, MatchSuggestion> = HashMap::new();
    for candidate in candidates.iter().filter(|c| !excluded.contains(&c.entry_id)) {
        let amount = if bank_is_debit {
            candidate.debit
        } else {
            candidate.credit
        };
        let days_apart = (candidate.entry_date - transaction.transaction_date).num_days().abs();
        let amount_difference = (amount - bank_amount).abs();
        if amount <= Decimal::ZERO || days_apart > settings.window_days || amount_difference > tolerance {
            continue;
        }

        let suggestion = MatchSuggestion {
            entry_id: candidate.entry_id,
            entry_number: candidate.entry_number.clone(),
            entry_date: candidate.entry_date,
            amount,
            amount_difference,
            days_apart,
        };
        best.entry(candidate.entry_id)
            .and_modify(|current| {
                if suggestion.amount_difference < current.amount_difference {
                    *current = suggestion.clone();
                }
            })
            .or_insert(suggestion);
    }

    let mut suggestions: Vec<MatchSuggestion> = best.into_values().collect();
    suggestions.sort_by(|a, b| {
        a.amount_difference
            .cmp(&b.amount_difference)
            .then_with(|| a.days_apart.cmp(&b.days_apart))
            .then_with(|| a.entry_number.cmp(&b.entry_number))
    });
    suggestions
}
