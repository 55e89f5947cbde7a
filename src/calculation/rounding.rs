//! Whole-number rounding for payslip amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to the nearest whole number, halves away from zero.
///
/// Every derived amount is rounded at the step that assigns it, so the
/// result of a chain of rules depends on the order they ran in.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::round_amount;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_amount(Decimal::from_str("1451.6129").unwrap()), Decimal::from(1452));
/// assert_eq!(round_amount(Decimal::from_str("1597.5").unwrap()), Decimal::from(1598));
/// ```
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rounds_down_below_half() {
        assert_eq!(round_amount(dec("1597.2")), dec("1597"));
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(round_amount(dec("2.5")), dec("3"));
        assert_eq!(round_amount(dec("0.5")), dec("1"));
    }

    #[test]
    fn test_whole_number_unchanged() {
        assert_eq!(round_amount(dec("45000")), dec("45000"));
        assert_eq!(round_amount(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_result_has_no_fractional_digits() {
        assert_eq!(round_amount(dec("1451.6129032258")).scale(), 0);
    }
}
