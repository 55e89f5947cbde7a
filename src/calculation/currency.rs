//! Currency display with Indian digit grouping.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount with two decimals and Indian digit grouping.
///
/// The last three integer digits form one group and the rest are grouped in
/// pairs. Negative amounts carry a leading `-`.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::from(100000)), "1,00,000.00");
/// assert_eq!(format_amount(Decimal::from(43403)), "43,403.00");
/// assert_eq!(format_amount(Decimal::from(-1500)), "-1,500.00");
/// ```
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", rounded.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut formatted = String::with_capacity(fixed.len() + integer.len() / 2 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        formatted.push('-');
    }
    formatted.push_str(&group_indian(integer));
    formatted.push('.');
    formatted.push_str(fraction);
    formatted
}

/// Formats an amount for display next to the currency code, e.g. `INR 45,000.00`.
pub fn format_inr(amount: Decimal) -> String {
    format!("INR {}", format_amount(amount))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}
