//! Common types used across the application.

pub mod dates;
pub mod id;
pub mod money;
pub mod pagination;

pub use dates::DateRange;
pub use id::*;
pub use money::{BALANCE_TOLERANCE, CurrencyCode, amounts_match, is_effectively_zero, round_money};
pub use pagination::{PageMeta, PageRequest, PageResponse};
