//! Display formatting shared by the executive summary and report exports.
//!
//! All helpers round midpoints away from zero so `0.05` prints as `0.1`
//! rather than following banker's rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Money, Percent, SqFt};

pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn fixed(value: Decimal, dp: usize) -> String {
    format!("{:.*}", dp, round_half_up(value, dp as u32))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn sign_of(value: Decimal) -> &'static str {
    if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    }
}

/// Whole number with thousands separators: `12345.6` -> `12,346`.
pub fn format_number(value: Decimal) -> String {
    let rounded = round_half_up(value, 0);
    format!(
        "{}{}",
        sign_of(rounded),
        group_thousands(&fixed(rounded.abs(), 0))
    )
}

/// Currency with a magnitude suffix: `$1.2B`, `$3.4M`, `$560K`, `$950`.
pub fn format_currency(value: Money) -> String {
    let abs = value.abs();
    // A tier whose rounded figure reaches 1000 rolls over to the next suffix.
    let rolls_over = |scaled: Decimal, dp: u32| round_half_up(scaled, dp) >= dec!(1000);
    let body = if abs >= dec!(1000000000) || rolls_over(abs / dec!(1000000), 1) {
        format!("{}B", fixed(abs / dec!(1000000000), 1))
    } else if abs >= dec!(1000000) || rolls_over(abs / dec!(1000), 0) {
        format!("{}M", fixed(abs / dec!(1000000), 1))
    } else if abs >= dec!(1000) || rolls_over(abs, 0) {
        format!("{}K", fixed(abs / dec!(1000), 0))
    } else {
        fixed(abs, 0)
    };
    format!("{}${}", sign_of(value), body)
}

/// Percentage on a 0-100 scale with one decimal: `60` -> `60.0%`.
pub fn format_percent(value: Percent) -> String {
    format!("{}%", fixed(value, 1))
}

/// Area in square feet: `12345` -> `12,345 sq ft`.
pub fn format_sq_ft(value: SqFt) -> String {
    format!("{} sq ft", format_number(value))
}

/// Multiple with two decimals: `1.853` -> `1.85x`.
pub fn format_multiple(value: Decimal) -> String {
    format!("{}x", fixed(value, 2))
}

/// Decimal without trailing zeros, for feet and ratios in prose.
pub fn format_plain(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_groups_thousands() {
        assert_eq!(format_number(dec!(0)), "0");
        assert_eq!(format_number(dec!(950)), "950");
        assert_eq!(format_number(dec!(5000)), "5,000");
        assert_eq!(format_number(dec!(1234567.5)), "1,234,568");
        assert_eq!(format_number(dec!(-43560)), "-43,560");
    }

    #[test]
    fn test_format_currency_suffixes() {
        assert_eq!(format_currency(dec!(950)), "$950");
        assert_eq!(format_currency(dec!(560400)), "$560K");
        assert_eq!(format_currency(dec!(3450000)), "$3.5M");
        assert_eq!(format_currency(dec!(1200000000)), "$1.2B");
        assert_eq!(format_currency(dec!(-2000000)), "-$2.0M");
        assert_eq!(format_currency(dec!(999950)), "$1.0M");
        assert_eq!(format_currency(dec!(999400)), "$999K");
        assert_eq!(format_currency(dec!(999.6)), "$1K");
        assert_eq!(format_currency(dec!(999960000)), "$1.0B");
    }

    #[test]
    fn test_format_percent_and_multiple() {
        assert_eq!(format_percent(dec!(60)), "60.0%");
        assert_eq!(format_percent(dec!(12.25)), "12.3%");
        assert_eq!(format_multiple(dec!(1.853)), "1.85x");
    }

    #[test]
    fn test_format_sq_ft_and_plain() {
        assert_eq!(format_sq_ft(dec!(12345)), "12,345 sq ft");
        assert_eq!(format_plain(dec!(7.50)), "7.5");
        assert_eq!(format_plain(dec!(25.0)), "25");
    }
}
