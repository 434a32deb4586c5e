//! Sequential fill of a progressive bracket table.
//!
//! Brackets are walked lowest first. Each one takes as much of the remaining
//! taxable income as fits between its lower bound (the previous bracket's
//! limit) and its own upper limit; the open-ended top bracket takes whatever
//! is left. Brackets after the income runs out are not reported at all.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{Bracket, allocate};
//!
//! let brackets = vec![
//!     Bracket::bounded(dec!(22000), dec!(0.10)),
//!     Bracket::unbounded(dec!(0.12)),
//! ];
//!
//! let allocation = allocate(dec!(30000), &brackets).unwrap();
//!
//! assert_eq!(allocation.results.len(), 2);
//! assert_eq!(allocation.results[0].tax_in_bracket, dec!(2200));
//! assert_eq!(allocation.results[1].income_in_bracket, dec!(8000));
//! assert_eq!(allocation.total_tax, dec!(3160));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::InvalidInput;
use crate::{Bracket, BracketResult};

/// Per-bracket results of one allocation plus their summed tax.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Allocation {
    pub results: Vec<BracketResult>,
    pub total_tax: Decimal,
}

impl Allocation {
    /// Sum of income placed across all brackets.
    pub fn allocated_income(&self) -> Decimal {
        self.results.iter().map(|r| r.income_in_bracket).sum()
    }

    /// Rate of the highest bracket that received income, zero when nothing
    /// was allocated.
    pub fn marginal_rate(&self) -> Decimal {
        self.results
            .last()
            .map(|r| r.rate)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Checks that a bracket table is well formed.
///
/// # Errors
///
/// - [`InvalidInput::RateOutOfRange`] if a rate is outside `[0, 1]`
/// - [`InvalidInput::UnboundedNotLast`] if an open-ended bracket is followed
///   by another bracket
/// - [`InvalidInput::NonIncreasingLimit`] if a limit is not strictly greater
///   than the one before it (the first must be greater than zero)
pub fn validate_brackets(brackets: &[Bracket]) -> Result<(), InvalidInput> {
    let mut previous_limit = Some(Decimal::ZERO);

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(InvalidInput::RateOutOfRange {
                index,
                rate: bracket.rate,
            });
        }

        let Some(previous) = previous_limit else {
            return Err(InvalidInput::UnboundedNotLast { index: index - 1 });
        };

        match bracket.upper_limit {
            Some(upper_limit) if upper_limit <= previous => {
                return Err(InvalidInput::NonIncreasingLimit {
                    index,
                    upper_limit,
                    previous_limit: previous,
                });
            }
            _ => {}
        }

        previous_limit = bracket.upper_limit;
    }

    Ok(())
}

/// Partitions `taxable_income` across `brackets` and computes the tax owed in
/// each.
///
/// `taxable_income` must already be floored at zero by the caller. Per-bracket
/// tax is `income_in_bracket * rate` with no rounding.
///
/// # Errors
///
/// Returns [`InvalidInput`] if:
/// - `taxable_income` is negative
/// - the table fails [`validate_brackets`]
/// - every bracket is bounded and income remains after the last one
pub fn allocate(
    taxable_income: Decimal,
    brackets: &[Bracket],
) -> Result<Allocation, InvalidInput> {
    if taxable_income < Decimal::ZERO {
        return Err(InvalidInput::NegativeTaxableIncome(taxable_income));
    }
    validate_brackets(brackets)?;

    let mut remaining = taxable_income;
    let mut previous_limit = Decimal::ZERO;
    let mut allocation = Allocation::default();

    for bracket in brackets {
        if remaining <= Decimal::ZERO {
            break;
        }

        let income_in_bracket = match bracket.upper_limit {
            Some(upper_limit) => (upper_limit - previous_limit).min(remaining),
            None => remaining,
        };
        let tax_in_bracket = income_in_bracket * bracket.rate;

        debug!(
            lower_bound = %previous_limit,
            rate = %bracket.rate,
            income = %income_in_bracket,
            tax = %tax_in_bracket,
            "allocated bracket"
        );

        allocation.results.push(BracketResult {
            lower_bound: previous_limit,
            upper_limit: bracket.upper_limit,
            rate: bracket.rate,
            income_in_bracket,
            tax_in_bracket,
        });
        allocation.total_tax += tax_in_bracket;
        remaining -= income_in_bracket;

        if let Some(upper_limit) = bracket.upper_limit {
            previous_limit = upper_limit;
        }
    }

    if remaining > Decimal::ZERO {
        return Err(InvalidInput::BracketTableExhausted {
            unallocated: remaining,
        });
    }

    Ok(allocation)
}
