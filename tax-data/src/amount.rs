use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a money amount.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid amount '{input}': {reason}")]
pub struct ParseAmountError {
    input: String,
    reason: String,
}

/// Normalizes input for decimal parsing: trims whitespace, strips a leading
/// `$` and removes commas (thousands separator).
fn normalize_amount_input(s: &str) -> String {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
    trimmed.replace(',', "")
}

/// Parses a money amount such as `1,234.56` or `$95000`.
///
/// Empty or whitespace-only input is treated as 0, matching an untouched
/// form field.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e: rust_decimal::Error| {
        tracing::warn!(input = %s, "invalid amount: {}", e);
        ParseAmountError {
            input: s.to_string(),
            reason: e.to_string(),
        }
    })
}
