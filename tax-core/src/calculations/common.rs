//! Shared decimal helpers for the calculations and their display.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Only used when presenting amounts; bracket math itself is never rounded.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(960.004)), dec!(960.00));
/// assert_eq!(round_half_up(dec!(960.005)), dec!(960.01));
/// assert_eq!(round_half_up(dec!(-960.005)), dec!(-960.01)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Formats an amount as dollars with thousands separators, e.g. `$1,234.50`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::format_currency;
///
/// assert_eq!(format_currency(dec!(3160)), "$3,160.00");
/// assert_eq!(format_currency(dec!(-1234567.891)), "-$1,234,567.89");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{cents}")
}

/// Formats a fractional rate as a percentage, e.g. `0.0632` -> `6.32%`.
pub fn format_percent(rate: Decimal) -> String {
    format!("{}%", round_half_up(rate * Decimal::ONE_HUNDRED).normalize())
}
