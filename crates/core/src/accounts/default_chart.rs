//! Default chart of accounts installed for a new company.
//!
//! Balance classes are explicit: `1200 Fixed Assets` is non-current even
//! though it sits among the low asset codes.

use serde::{Deserialize, Serialize};

use super::types::{AccountType, BalanceClass};

/// The job a company account performs in automatic subledger postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingRole {
    /// Cash used when a payment names no bank account.
    Cash,
    /// Accounts receivable, debited by invoices.
    Receivable,
    /// Accounts payable, credited by bills.
    Payable,
    /// Default revenue account for invoice lines.
    Sales,
    /// Default expense account for bill lines.
    Purchases,
    /// Output tax collected on invoices.
    TaxPayable,
    /// Input tax recoverable on bills.
    TaxReceivable,
}

impl PostingRole {
    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Receivable => "accounts receivable",
            Self::Payable => "accounts payable",
            Self::Sales => "sales",
            Self::Purchases => "purchases",
            Self::TaxPayable => "tax payable",
            Self::TaxReceivable => "tax receivable",
        }
    }
}

impl std::fmt::Display for PostingRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One account of the default chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountTemplate {
    /// Account code.
    pub code: &'static str,
    /// Account name.
    pub name: &'static str,
    /// Account type.
    pub account_type: AccountType,
    /// Balance-sheet bucket.
    pub balance_class: Option<BalanceClass>,
    /// Protected from edits and deletion.
    pub is_system: bool,
    /// Code of the parent account, installed earlier in the list.
    pub parent_code: Option<&'static str>,
    /// Posting role this account fills by default.
    pub role: Option<PostingRole>,
}

const fn account(
    code: &'static str,
    name: &'static str,
    account_type: AccountType,
    balance_class: Option<BalanceClass>,
) -> AccountTemplate {
    AccountTemplate {
        code,
        name,
        account_type,
        balance_class,
        is_system: false,
        parent_code: None,
        role: None,
    }
}

const fn system(template: AccountTemplate, role: Option<PostingRole>) -> AccountTemplate {
    AccountTemplate {
        is_system: true,
        role,
        ..template
    }
}

const fn under(template: AccountTemplate, parent_code: &'static str) -> AccountTemplate {
    AccountTemplate {
        parent_code: Some(parent_code),
        ..template
    }
}

const CURRENT: Option<BalanceClass> = Some(BalanceClass::Current);
const NON_CURRENT: Option<BalanceClass> = Some(BalanceClass::NonCurrent);

/// The default chart, parents before children.
pub const DEFAULT_CHART: &[AccountTemplate] = &[
    system(account("1000", "Cash and Bank", AccountType::Asset, CURRENT), Some(PostingRole::Cash)),
    system(
        account("1100", "Accounts Receivable", AccountType::Asset, CURRENT),
        Some(PostingRole::Receivable),
    ),
    system(
        account("1150", "VAT Receivable", AccountType::Asset, CURRENT),
        Some(PostingRole::TaxReceivable),
    ),
    system(account("1200", "Fixed Assets", AccountType::Asset, NON_CURRENT), None),
    under(account("1210", "Office Equipment", AccountType::Asset, NON_CURRENT), "1200"),
    under(account("1220", "Motor Vehicles", AccountType::Asset, NON_CURRENT), "1200"),
    account("1300", "Inventory", AccountType::Asset, CURRENT),
    system(
        account("2000", "Accounts Payable", AccountType::Liability, CURRENT),
        Some(PostingRole::Payable),
    ),
    system(
        account("2100", "VAT Payable", AccountType::Liability, CURRENT),
        Some(PostingRole::TaxPayable),
    ),
    account("2200", "Accrued Liabilities", AccountType::Liability, CURRENT),
    account("2500", "Long-term Loans", AccountType::Liability, NON_CURRENT),
    system(account("3000", "Share Capital", AccountType::Equity, None), None),
    system(account("3100", "Retained Earnings", AccountType::Equity, None), None),
    system(account("4000", "Sales", AccountType::Revenue, None), Some(PostingRole::Sales)),
    account("4100", "Other Income", AccountType::Revenue, None),
    system(
        account("5000", "Purchases", AccountType::Expense, None),
        Some(PostingRole::Purchases),
    ),
    account("6000", "Operating Expenses", AccountType::Expense, None),
    under(account("6100", "Bank Charges", AccountType::Expense, None), "6000"),
    under(account("6200", "Salaries and Wages", AccountType::Expense, None), "6000"),
    under(account("6300", "Rent", AccountType::Expense, None), "6000"),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = DEFAULT_CHART.iter().map(|t| t.code).collect();
        assert_eq!(codes.len(), DEFAULT_CHART.len());
    }

    #[test]
    fn test_parents_precede_children() {
        let mut seen = HashSet::new();
        for template in DEFAULT_CHART {
            if let Some(parent) = template.parent_code {
                assert!(seen.contains(parent), "{} listed before its parent", template.code);
            }
            seen.insert(template.code);
        }
    }

    #[test]
    fn test_every_posting_role_is_filled_once() {
        let roles = [
            PostingRole::Cash,
            PostingRole::Receivable,
            PostingRole::Payable,
            PostingRole::Sales,
            PostingRole::Purchases,
            PostingRole::TaxPayable,
            PostingRole::TaxReceivable,
        ];
        for role in roles {
            let count = DEFAULT_CHART.iter().filter(|t| t.role == Some(role)).count();
            assert_eq!(count, 1, "role {role} filled {count} times");
        }
    }

    #[test]
    fn test_fixed_assets_are_non_current() {
        let fixed = DEFAULT_CHART.iter().find(|t| t.code == "1200").unwrap();
        assert_eq!(fixed.balance_class, Some(BalanceClass::NonCurrent));

        for template in DEFAULT_CHART {
            let expects_class = matches!(
                template.account_type,
                AccountType::Asset | AccountType::Liability
            );
            assert_eq!(template.balance_class.is_some(), expects_class, "{}", template.code);
        }
    }
}
