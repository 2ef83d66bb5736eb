//! Bank reconciliation.
//!
//! Statement import validation, the adjusted-balance snapshot taken when a
//! reconciliation starts, completion and matching guards, and fuzzy match
//! suggestions between bank transactions and journal entries.

pub mod error;
pub mod matching;
pub mod snapshot;
pub mod statement;
pub mod types;

#[cfg(test)]
mod snapshot_props;

pub use error::ReconciliationError;
pub use matching::{ensure_can_match, ensure_can_unmatch, suggest_matches};
pub use snapshot::{compute_snapshot, ensure_completable};
pub use statement::{batch_net, validate_statement};
pub use types::{
    BankLine, MatchCandidate, MatchSettings, MatchSuggestion, ReconciliationSnapshot,
    ReconciliationStatus, StatementLineInput,
};
