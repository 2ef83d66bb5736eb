//! Account classification types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The five account types of double-entry bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, receivables, equipment).
    Asset,
    /// Obligations owed (payables, taxes due).
    Liability,
    /// Owners' residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// All account types in chart order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// The side on which this account type increases.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns true for accounts reported on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// Side on which an account's balance is naturally positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Debit-normal (assets, expenses).
    Debit,
    /// Credit-normal (liabilities, equity, revenue).
    Credit,
}

impl NormalBalance {
    /// Converts a signed `debit - credit` balance into this side's natural sign.
    #[must_use]
    pub fn natural(self, signed_balance: Decimal) -> Decimal {
        match self {
            Self::Debit => signed_balance,
            Self::Credit => -signed_balance,
        }
    }
}

/// Balance-sheet bucket for asset and liability accounts.
///
/// Stored on the account instead of being guessed from the account code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceClass {
    /// Realised or settled within the operating cycle.
    Current,
    /// Long-lived assets and long-term obligations.
    NonCurrent,
}

impl BalanceClass {
    /// Class applied when an account is created without one.
    ///
    /// Assets and liabilities default to `Current`; other types carry none.
    #[must_use]
    pub const fn default_for(account_type: AccountType) -> Option<Self> {
        match account_type {
            AccountType::Asset | AccountType::Liability => Some(Self::Current),
            AccountType::Equity | AccountType::Revenue | AccountType::Expense => None,
        }
    }
}

/// What the ledger needs to know about an account referenced by a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// The account ID.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Owning company.
    pub company_id: Uuid,
    /// Account type.
    pub account_type: AccountType,
    /// Whether the account is active.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normal_balance_by_type() {
        assert_eq!(AccountType::Asset.normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Expense.normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Liability.normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Equity.normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Revenue.normal_balance(), NormalBalance::Credit);
    }

    #[test]
    fn test_natural_sign() {
        assert_eq!(NormalBalance::Debit.natural(dec!(100)), dec!(100));
        assert_eq!(NormalBalance::Credit.natural(dec!(-100)), dec!(100));
    }

    #[test]
    fn test_account_type_round_trip() {
        for account_type in AccountType::ALL {
            assert_eq!(account_type.as_str().parse::<AccountType>(), Ok(account_type));
        }
        assert!("cash".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_default_balance_class() {
        assert_eq!(BalanceClass::default_for(AccountType::Asset), Some(BalanceClass::Current));
        assert_eq!(BalanceClass::default_for(AccountType::Liability), Some(BalanceClass::Current));
        assert_eq!(BalanceClass::default_for(AccountType::Revenue), None);
    }
}
