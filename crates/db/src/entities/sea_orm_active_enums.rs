//! Enumerations stored as short strings.
//!
//! Each enum mirrors a `tally-core` type and converts both ways, so
//! repositories hand core values straight to the entity models.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tally_core::accounts::{AccountType as CoreAccountType, BalanceClass as CoreBalanceClass};
use tally_core::fiscal::{FiscalPeriodStatus as CorePeriodStatus, PeriodType as CorePeriodType};
use tally_core::ledger::{JournalEntryStatus as CoreEntryStatus, JournalEntryType as CoreEntryType};
use tally_core::reconciliation::ReconciliationStatus as CoreReconciliationStatus;
use tally_core::subledger::{
    DocumentKind as CoreDocumentKind, DocumentStatus as CoreDocumentStatus,
    PartyKind as CorePartyKind, PaymentMethod as CorePaymentMethod,
};

/// Declares a string-backed active enum and its conversions to and from `$core`.
macro_rules! active_enum {
    ($(#[$meta:meta])* $name:ident mirrors $core:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
        #[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
        pub enum $name {
            $(
                #[allow(missing_docs)]
                #[sea_orm(string_value = $value)]
                $variant,
            )+
        }

        impl From<$core> for $name {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$name> for $core {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => Self::$variant,)+
                }
            }
        }
    };
}

active_enum! {
    /// Account classification.
    AccountType mirrors CoreAccountType {
        Asset => "asset",
        Liability => "liability",
        Equity => "equity",
        Revenue => "revenue",
        Expense => "expense",
    }
}

active_enum! {
    /// Balance sheet bucket of an asset or liability account.
    BalanceClass mirrors CoreBalanceClass {
        Current => "current",
        NonCurrent => "non_current",
    }
}

active_enum! {
    /// Length of a fiscal period.
    PeriodType mirrors CorePeriodType {
        Year => "year",
        Quarter => "quarter",
        Month => "month",
    }
}

active_enum! {
    /// Posting state of a fiscal period.
    FiscalPeriodStatus mirrors CorePeriodStatus {
        Open => "open",
        Closed => "closed",
        Locked => "locked",
    }
}

active_enum! {
    /// Journal entry lifecycle state.
    JournalEntryStatus mirrors CoreEntryStatus {
        Draft => "draft",
        Posted => "posted",
        Reversed => "reversed",
    }
}

active_enum! {
    /// Business origin of a journal entry.
    JournalEntryType mirrors CoreEntryType {
        General => "general",
        Sales => "sales",
        Purchase => "purchase",
        Receipt => "receipt",
        Disbursement => "disbursement",
        Adjustment => "adjustment",
        Opening => "opening",
    }
}

active_enum! {
    /// Customer or supplier.
    PartyKind mirrors CorePartyKind {
        Customer => "customer",
        Supplier => "supplier",
    }
}

active_enum! {
    /// Invoice or bill.
    DocumentKind mirrors CoreDocumentKind {
        Invoice => "invoice",
        Bill => "bill",
    }
}

active_enum! {
    /// Settlement state of an invoice or bill.
    DocumentStatus mirrors CoreDocumentStatus {
        Draft => "draft",
        Sent => "sent",
        Approved => "approved",
        Partial => "partial",
        Paid => "paid",
        Overdue => "overdue",
        Cancelled => "cancelled",
    }
}

active_enum! {
    /// How a payment was made.
    PaymentMethod mirrors CorePaymentMethod {
        Cash => "cash",
        BankTransfer => "bank_transfer",
        Cheque => "cheque",
        Card => "card",
    }
}

active_enum! {
    /// Bank reconciliation state.
    ReconciliationStatus mirrors CoreReconciliationStatus {
        InProgress => "in_progress",
        Completed => "completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_values_match_core_storage_names() {
        for status in [
            CoreEntryStatus::Draft,
            CoreEntryStatus::Posted,
            CoreEntryStatus::Reversed,
        ] {
            assert_eq!(JournalEntryStatus::from(status).to_value(), status.as_str());
        }
        for account_type in CoreAccountType::ALL {
            assert_eq!(AccountType::from(account_type).to_value(), account_type.as_str());
        }
        assert_eq!(
            ReconciliationStatus::from(CoreReconciliationStatus::InProgress).to_value(),
            "in_progress"
        );
        assert_eq!(PaymentMethod::BankTransfer.to_value(), CorePaymentMethod::BankTransfer.as_str());
    }

    #[test]
    fn test_round_trip_through_core() {
        let core: CoreDocumentStatus = DocumentStatus::Overdue.into();
        assert_eq!(core, CoreDocumentStatus::Overdue);
        assert_eq!(DocumentStatus::from(core), DocumentStatus::Overdue);
        assert_eq!(BalanceClass::from(CoreBalanceClass::NonCurrent).to_value(), "non_current");
    }
}
