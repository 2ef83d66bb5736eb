//! Line validation for journal entries.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{JournalLineInput, LineTotals, PreparedLine};

/// Validates a complete set of journal lines.
///
/// Requires at least two lines, each with non-negative amounts on exactly
/// one side, and total debits equal to total credits within 0.01. Line
/// numbers in errors are 1-based.
///
/// # Errors
///
/// Returns the first rule violated, or `Unbalanced` with both totals.
pub fn validate_lines(lines: &[JournalLineInput]) -> Result<LineTotals, LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines(lines.len()));
    }

    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;

    for (index, line) in lines.iter().enumerate() {
        let position = index + 1;
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(position));
        }
        if line.debit > Decimal::ZERO && line.credit > Decimal::ZERO {
            return Err(LedgerError::BothSides(position));
        }
        if line.debit.is_zero() && line.credit.is_zero() {
            return Err(LedgerError::ZeroLine(position));
        }
        debit += line.debit;
        credit += line.credit;
    }

    let totals = LineTotals::new(debit, credit);
    if !totals.is_balanced {
        return Err(LedgerError::Unbalanced { debit, credit });
    }
    Ok(totals)
}

/// Validates lines and assigns sequential line numbers from 1.
///
/// # Errors
///
/// See [`validate_lines`].
pub fn prepare_lines(lines: Vec<JournalLineInput>) -> Result<(Vec<PreparedLine>, LineTotals), LedgerError> {
    let totals = validate_lines(&lines)?;
    let prepared = lines
        .into_iter()
        .zip(1..)
        .map(|(line, line_number)| PreparedLine {
            line_number,
            account_id: line.account_id,
            debit: line.debit,
            credit: line.credit,
            description: line.description,
        })
        .collect();
    Ok((prepared, totals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn cash() -> Uuid {
        Uuid::from_u128(1)
    }

    fn revenue() -> Uuid {
        Uuid::from_u128(2)
    }

    #[test]
    fn test_balanced_lines() {
        let lines = vec![
            JournalLineInput::debit(cash(), dec!(100)),
            JournalLineInput::credit(revenue(), dec!(100)),
        ];
        let totals = validate_lines(&lines).unwrap();
        assert_eq!(totals.debit, dec!(100));
        assert!(totals.is_balanced);
    }

    #[test]
    fn test_unbalanced_lines_report_totals() {
        let lines = vec![
            JournalLineInput::debit(cash(), dec!(100)),
            JournalLineInput::credit(revenue(), dec!(90)),
        ];
        let err = validate_lines(&lines).unwrap_err();
        assert_eq!(err.to_string(), "Debits: 100, Credits: 90");
    }

    #[test]
    fn test_sub_cent_difference_is_balanced() {
        let lines = vec![
            JournalLineInput::debit(cash(), dec!(100.004)),
            JournalLineInput::credit(revenue(), dec!(100)),
        ];
        assert!(validate_lines(&lines).is_ok());

        let off_by_cent = vec![
            JournalLineInput::debit(cash(), dec!(100.01)),
            JournalLineInput::credit(revenue(), dec!(100)),
        ];
        assert!(validate_lines(&off_by_cent).is_err());
    }

    #[test]
    fn test_single_line_rejected() {
        let lines = vec![JournalLineInput::debit(cash(), dec!(100))];
        assert_eq!(validate_lines(&lines), Err(LedgerError::InsufficientLines(1)));
        assert_eq!(validate_lines(&[]), Err(LedgerError::InsufficientLines(0)));
    }

    #[test]
    fn test_line_rules() {
        let both = JournalLineInput {
            account_id: cash(),
            debit: dec!(10),
            credit: dec!(10),
            description: None,
        };
        let zero = JournalLineInput::debit(cash(), Decimal::ZERO);
        let negative = JournalLineInput::credit(revenue(), dec!(-5));
        let ok = JournalLineInput::credit(revenue(), dec!(10));

        assert_eq!(validate_lines(&[ok.clone(), both]), Err(LedgerError::BothSides(2)));
        assert_eq!(validate_lines(&[zero, ok.clone()]), Err(LedgerError::ZeroLine(1)));
        assert_eq!(validate_lines(&[ok, negative]), Err(LedgerError::NegativeAmount(2)));
    }

    #[test]
    fn test_prepare_numbers_lines_in_order() {
        let lines = vec![
            JournalLineInput::debit(cash(), dec!(60)),
            JournalLineInput::debit(cash(), dec!(40)),
            JournalLineInput::credit(revenue(), dec!(100)).with_description("sale"),
        ];
        let (prepared, totals) = prepare_lines(lines).unwrap();
        let numbers: Vec<_> = prepared.iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, [1, 2, 3]);
        assert_eq!(prepared[2].description.as_deref(), Some("sale"));
        assert_eq!(totals.credit, dec!(100));
    }
}
