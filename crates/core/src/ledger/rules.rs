//! Lifecycle guards for journal entries.

use std::collections::HashMap;
use std::hash::BuildHasher;

use tally_shared::types::CompanyScope;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{JournalEntryStatus, PreparedLine};
use crate::accounts::AccountInfo;

/// Only draft entries can be updated.
pub fn ensure_editable(status: JournalEntryStatus) -> Result<(), LedgerError> {
    if status.is_editable() {
        Ok(())
    } else {
        Err(LedgerError::CannotModify(status))
    }
}

/// Posting moves DRAFT to POSTED and nothing else.
pub fn ensure_postable(status: JournalEntryStatus) -> Result<(), LedgerError> {
    match status {
        JournalEntryStatus::Draft => Ok(()),
        other => Err(LedgerError::CannotPost(other)),
    }
}

/// A posted entry can be reversed exactly once.
pub fn ensure_reversible(
    entry_id: Uuid,
    status: JournalEntryStatus,
    already_reversed: bool,
) -> Result<(), LedgerError> {
    match status {
        JournalEntryStatus::Posted if already_reversed => Err(LedgerError::AlreadyReversed(entry_id)),
        JournalEntryStatus::Posted => Ok(()),
        JournalEntryStatus::Reversed => Err(LedgerError::AlreadyReversed(entry_id)),
        JournalEntryStatus::Draft => Err(LedgerError::CannotReverse(status)),
    }
}

/// Only draft entries can be deleted.
pub fn ensure_deletable(status: JournalEntryStatus) -> Result<(), LedgerError> {
    if status.is_editable() {
        Ok(())
    } else {
        Err(LedgerError::CannotDelete(status))
    }
}

/// Every line must reference an active account of the caller's company.
///
/// `accounts` holds whatever the store returned for the referenced ids; a
/// missing id or an account of another tenant or company is reported the same
/// way so foreign accounts are not disclosed.
pub fn check_accounts<S: BuildHasher>(
    scope: &CompanyScope,
    lines: &[PreparedLine],
    accounts: &HashMap<Uuid, AccountInfo, S>,
) -> Result<(), LedgerError> {
    for line in lines {
        let account = accounts
            .get(&line.account_id)
            .filter(|a| scope.owns(a.tenant_id, a.company_id))
            .ok_or(LedgerError::AccountNotInScope(line.account_id))?;
        if !account.is_active {
            return Err(LedgerError::AccountInactive(line.account_id));
        }
    }
    Ok(())
}
