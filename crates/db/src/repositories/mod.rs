//! Repositories for ledger data access.
//!
//! Every repository is a module of free async functions that take the
//! connection or transaction to run on, plus the [`CompanyScope`] the call is
//! bound to. Functions that write several rows open a transaction on the
//! handle they are given; passing a transaction nests them as savepoints.
//!
//! [`CompanyScope`]: tally_shared::types::CompanyScope

pub mod accounts;
pub mod banking;
pub mod fiscal;
pub mod journal;
pub mod reports;
pub mod sequences;
pub mod subledger;

use sea_orm::prelude::DateTimeWithTimeZone;
use tally_shared::config::LedgerConfig;
use tally_shared::types::CurrencyCode;

/// Current time as stored in timestamp columns.
pub(crate) fn now() -> DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

/// Normalizes `code`, falling back to the configured default currency.
pub(crate) fn resolve_currency(code: Option<&str>, config: &LedgerConfig) -> Result<String, String> {
    code.unwrap_or(&config.default_currency)
        .parse::<CurrencyCode>()
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_currency_defaults_and_normalizes() {
        let config = LedgerConfig::default();
        assert_eq!(resolve_currency(None, &config).unwrap(), "MUR");
        assert_eq!(resolve_currency(Some("eur"), &config).unwrap(), "EUR");
        assert!(resolve_currency(Some("EURO"), &config).is_err());
    }
}
