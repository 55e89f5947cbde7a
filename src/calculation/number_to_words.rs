//! Amounts in words using the Indian numbering system.
//!
//! Groups are Thousand (10^3), Lakh (10^5) and Crore (10^7). Every result
//! ends in "Only", as printed under the net payable on a payslip.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::rounding::round_amount;

const ONES: [&str; 10] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

const TEENS: [&str; 10] = [
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

/// Spells out a whole number followed by "Only".
///
/// Negative numbers are prefixed with "Minus". Crore counts of a thousand or
/// more are spelled out recursively.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::number_to_words;
///
/// assert_eq!(number_to_words(0), "Zero Only");
/// assert_eq!(number_to_words(1000), "One Thousand Only");
/// assert_eq!(number_to_words(100000), "One Lakh Only");
/// assert_eq!(number_to_words(43403), "Forty Three Thousand Four Hundred Three Only");
/// ```
pub fn number_to_words(n: i64) -> String {
    if n == 0 {
        return "Zero Only".to_string();
    }

    let mut words = Vec::new();
    if n < 0 {
        words.push("Minus");
    }
    spell(n.unsigned_abs(), &mut words);
    words.push("Only");
    words.join(" ")
}

/// Spells out an amount after rounding it to a whole number.
///
/// Amounts beyond the `i64` range are clamped.
pub fn amount_to_words(amount: Decimal) -> String {
    let rounded = round_amount(amount);
    let n = rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    });
    number_to_words(n)
}

fn spell(n: u64, words: &mut Vec<&'static str>) {
    for (scale, name) in [(CRORE, "Crore"), (LAKH, "Lakh"), (THOUSAND, "Thousand")] {
        if n >= scale {
            let count = n / scale;
            if count >= THOUSAND {
                spell(count, words);
            } else {
                spell_below_thousand(count, words);
            }
            words.push(name);
            let remainder = n % scale;
            if remainder > 0 {
                spell(remainder, words);
            }
            return;
        }
    }
    spell_below_thousand(n, words);
}

fn spell_below_thousand(n: u64, words: &mut Vec<&'static str>) {
    let mut n = n as usize;
    if n >= 100 {
        words.push(ONES[n / 100]);
        words.push("Hundred");
        n %= 100;
    }
    if n >= 20 {
        words.push(TENS[n / 10]);
        n %= 10;
    } else if n >= 10 {
        words.push(TEENS[n - 10]);
        return;
    }
    if n > 0 {
        words.push(ONES[n]);
    }
}
