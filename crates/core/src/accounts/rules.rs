//! Guards applied to chart-of-accounts mutations.

use std::collections::{HashMap, HashSet};

use tally_shared::types::CompanyScope;
use uuid::Uuid;

use super::error::AccountError;

/// Longest code accepted for an account.
pub const MAX_CODE_LEN: usize = 20;

/// Validates an account code: non-empty, no whitespace, at most 20 characters.
pub fn validate_code(code: &str) -> Result<(), AccountError> {
    if code.is_empty() || code.len() > MAX_CODE_LEN || code.chars().any(char::is_whitespace) {
        return Err(AccountError::InvalidCode(code.to_string()));
    }
    Ok(())
}

/// Checks that a parent account lives in the same tenant and company.
pub fn ensure_parent_in_scope(
    scope: &CompanyScope,
    parent_id: Uuid,
    parent_tenant: Uuid,
    parent_company: Uuid,
) -> Result<(), AccountError> {
    if scope.owns(parent_tenant, parent_company) {
        Ok(())
    } else {
        Err(AccountError::ParentWrongCompany(parent_id))
    }
}

/// Returns true if attaching `account_id` under `new_parent` would form a cycle.
///
/// `parents` maps every account of the company to its current parent. The walk
/// stops at a root, or at a node already visited (an existing corrupt loop).
#[must_use]
pub fn creates_cycle<S: std::hash::BuildHasher>(
    account_id: Uuid,
    new_parent: Uuid,
    parents: &HashMap<Uuid, Option<Uuid>, S>,
) -> bool {
    let mut seen = HashSet::new();
    let mut cursor = Some(new_parent);

    while let Some(current) = cursor {
        if current == account_id {
            return true;
        }
        if !seen.insert(current) {
            return false;
        }
        cursor = parents.get(&current).copied().flatten();
    }
    false
}

/// System accounts reject every edit, activation toggling included.
pub fn ensure_editable(account_id: Uuid, is_system: bool) -> Result<(), AccountError> {
    if is_system {
        return Err(AccountError::SystemAccountLocked(account_id));
    }
    Ok(())
}

/// An account can only be deleted when nothing references it.
pub fn ensure_deletable(
    account_id: Uuid,
    is_system: bool,
    line_count: u64,
    child_count: u64,
) -> Result<(), AccountError> {
    ensure_editable(account_id, is_system)?;
    if line_count > 0 {
        return Err(AccountError::HasJournalLines {
            account_id,
            count: line_count,
        });
    }
    if child_count > 0 {
        return Err(AccountError::HasChildren {
            account_id,
            count: child_count,
        });
    }
    Ok(())
}

/// The type of an account is fixed once journal lines reference it.
pub fn ensure_type_change_allowed(account_id: Uuid, line_count: u64) -> Result<(), AccountError> {
    if line_count > 0 {
        return Err(AccountError::TypeChangeNotAllowed(account_id));
    }
    Ok(())
}
