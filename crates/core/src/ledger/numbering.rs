//! Human-readable document numbers.
//!
//! Numbers have the form `PREFIX-YYYY-NNNNN`: a prefix per document type, the
//! year of the document date, and a sequence zero-padded to five digits. The
//! sequence restarts every year and is kept per company.

use serde::{Deserialize, Serialize};

/// Document types that draw numbers from a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentPrefix {
    /// `JE`
    JournalEntry,
    /// `INV`
    Invoice,
    /// `BILL`
    Bill,
    /// `PMT`
    CustomerPayment,
    /// `APPMT`
    SupplierPayment,
    /// `CUST`
    Customer,
    /// `SUPP`
    Supplier,
}

impl DocumentPrefix {
    /// The literal prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JournalEntry => "JE",
            Self::Invoice => "INV",
            Self::Bill => "BILL",
            Self::CustomerPayment => "PMT",
            Self::SupplierPayment => "APPMT",
            Self::Customer => "CUST",
            Self::Supplier => "SUPP",
        }
    }

    /// Key of the counter row backing this prefix in `year`, e.g. `JE-2026`.
    #[must_use]
    pub fn scope(self, year: i32) -> String {
        format!("{}-{year}", self.as_str())
    }
}

/// Formats a document number.
#[must_use]
pub fn format_number(prefix: DocumentPrefix, year: i32, sequence: u32) -> String {
    format!("{}-{year}-{sequence:05}", prefix.as_str())
}

/// Extracts the sequence from a number of the given prefix and year.
#[must_use]
pub fn parse_sequence(number: &str, prefix: DocumentPrefix, year: i32) -> Option<u32> {
    number
        .strip_prefix(prefix.as_str())?
        .strip_prefix('-')?
        .strip_prefix(&year.to_string())?
        .strip_prefix('-')?
        .parse()
        .ok()
}

/// Highest sequence among `numbers` for the prefix and year, zero if none.
#[must_use]
pub fn max_sequence<'a, I>(numbers: I, prefix: DocumentPrefix, year: i32) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    numbers
        .into_iter()
        .filter_map(|n| parse_sequence(n, prefix, year))
        .max()
        .unwrap_or(0)
}
