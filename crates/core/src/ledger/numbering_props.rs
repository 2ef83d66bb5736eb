//! Property-based tests for document numbering.

use proptest::prelude::*;

use super::numbering::{DocumentPrefix, format_number, max_sequence};

fn prefix_strategy() -> impl Strategy<Value = DocumentPrefix> {
    prop_oneof![
        Just(DocumentPrefix::JournalEntry),
        Just(DocumentPrefix::Invoice),
        Just(DocumentPrefix::Bill),
        Just(DocumentPrefix::CustomerPayment),
        Just(DocumentPrefix::SupplierPayment),
        Just(DocumentPrefix::Customer),
        Just(DocumentPrefix::Supplier),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The next number seeded from existing documents never collides with them.
    #[test]
    fn prop_next_after_max_is_unused(
        prefix in prefix_strategy(),
        year in 2000i32..2100,
        sequences in prop::collection::hash_set(1u32..99_999, 0..20),
    ) {
        let numbers: Vec<String> = sequences.iter().map(|s| format_number(prefix, year, *s)).collect();
        let next = max_sequence(numbers.iter().map(String::as_str), prefix, year) + 1;

        prop_assert!(sequences.iter().all(|s| *s < next));
        prop_assert!(!numbers.contains(&format_number(prefix, year, next)));
    }

    /// Within five digits, string order of numbers follows sequence order.
    #[test]
    fn prop_numbers_sort_by_sequence(a in 1u32..100_000, b in 1u32..100_000) {
        let left = format_number(DocumentPrefix::JournalEntry, 2026, a);
        let right = format_number(DocumentPrefix::JournalEntry, 2026, b);
        prop_assert_eq!(left.cmp(&right), a.cmp(&b));
    }

    /// Numbers of another year never feed the sequence.
    #[test]
    fn prop_other_years_ignored(prefix in prefix_strategy(), seq in 1u32..99_999) {
        let last_year = format_number(prefix, 2025, seq);
        prop_assert_eq!(max_sequence([last_year.as_str()], prefix, 2026), 0);
    }
}
