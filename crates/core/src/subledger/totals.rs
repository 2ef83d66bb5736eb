//! Line and document totals.

use rust_decimal::Decimal;
use tally_shared::types::round_money;

use super::error::SubledgerError;
use super::types::{ComputedLine, DocumentLineInput, DocumentTotals};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Validates document lines and derives their amounts.
///
/// Each line's subtotal and tax are rounded to cents; document totals are
/// the sums of the rounded line figures, so they always add up.
///
/// # Errors
///
/// Returns the first invalid line, or `ZeroTotal` if nothing is charged.
pub fn compute_lines(
    lines: Vec<DocumentLineInput>,
) -> Result<(Vec<ComputedLine>, DocumentTotals), SubledgerError> {
    if lines.is_empty() {
        return Err(SubledgerError::NoLines);
    }

    let mut totals = DocumentTotals::default();
    let mut computed = Vec::with_capacity(lines.len());

    for (line, line_number) in lines.into_iter().zip(1..) {
        let position = computed.len() + 1;
        if line.description.trim().is_empty() {
            return Err(SubledgerError::EmptyLineDescription(position));
        }
        if line.quantity <= Decimal::ZERO {
            return Err(SubledgerError::InvalidQuantity(position));
        }
        if line.unit_price < Decimal::ZERO {
            return Err(SubledgerError::NegativePrice(position));
        }
        if line.tax_rate < Decimal::ZERO || line.tax_rate > HUNDRED {
            return Err(SubledgerError::InvalidTaxRate(position));
        }

        let subtotal = round_money(line.quantity * line.unit_price);
        let tax_amount = round_money(subtotal * line.tax_rate / HUNDRED);
        let total = subtotal + tax_amount;

        totals.subtotal += subtotal;
        totals.tax_total += tax_amount;
        totals.total += total;

        computed.push(ComputedLine {
            line_number,
            description: line.description,
            account_id: line.account_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
            tax_rate: line.tax_rate,
            subtotal,
            tax_amount,
            total,
        });
    }

    if totals.total <= Decimal::ZERO {
        return Err(SubledgerError::ZeroTotal);
    }
    Ok((computed, totals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(quantity: Decimal, unit_price: Decimal, tax_rate: Decimal) -> DocumentLineInput {
        DocumentLineInput {
            description: "Consulting".into(),
            account_id: None,
            quantity,
            unit_price,
            tax_rate,
        }
    }

    #[test]
    fn test_totals_with_tax() {
        let (lines, totals) = compute_lines(vec![
            line(dec!(2), dec!(500), dec!(15)),
            line(dec!(1), dec!(250), dec!(0)),
        ])
        .unwrap();

        assert_eq!(lines[0].subtotal, dec!(1000));
        assert_eq!(lines[0].tax_amount, dec!(150));
        assert_eq!(lines[1].line_number, 2);
        assert_eq!(totals.subtotal, dec!(1250));
        assert_eq!(totals.tax_total, dec!(150));
        assert_eq!(totals.total, dec!(1400));
    }

    #[test]
    fn test_rounding_to_cents() {
        let (lines, totals) = compute_lines(vec![line(dec!(3), dec!(0.333), dec!(15))]).unwrap();
        assert_eq!(lines[0].subtotal, dec!(1.00));
        assert_eq!(lines[0].tax_amount, dec!(0.15));
        assert_eq!(totals.total, dec!(1.15));

        // 1.545: half away from zero, not to even
        let (lines, _) = compute_lines(vec![line(dec!(1), dec!(10.30), dec!(15))]).unwrap();
        assert_eq!(lines[0].tax_amount, dec!(1.55));
    }

    #[test]
    fn test_line_rules() {
        assert_eq!(compute_lines(vec![]), Err(SubledgerError::NoLines));
        assert_eq!(
            compute_lines(vec![line(dec!(0), dec!(1), dec!(0))]),
            Err(SubledgerError::InvalidQuantity(1))
        );
        assert_eq!(
            compute_lines(vec![line(dec!(1), dec!(1), dec!(0)), line(dec!(1), dec!(-1), dec!(0))]),
            Err(SubledgerError::NegativePrice(2))
        );
        assert_eq!(
            compute_lines(vec![line(dec!(1), dec!(1), dec!(101))]),
            Err(SubledgerError::InvalidTaxRate(1))
        );
        assert_eq!(
            compute_lines(vec![line(dec!(1), dec!(0), dec!(15))]),
            Err(SubledgerError::ZeroTotal)
        );
    }
}
