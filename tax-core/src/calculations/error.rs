use rust_decimal::Decimal;
use thiserror::Error;

/// Input rejected by the allocator, the flow builder or the report pipeline.
///
/// Nothing is clamped silently: callers that want clamping (for instance
/// flooring taxable income at zero) do it before calling in.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("taxable income {0} is negative")]
    NegativeTaxableIncome(Decimal),

    #[error(
        "bracket {index} upper limit {upper_limit} must be greater than the previous limit {previous_limit}"
    )]
    NonIncreasingLimit {
        index: usize,
        upper_limit: Decimal,
        previous_limit: Decimal,
    },

    /// An open-ended bracket must be the last entry in its table.
    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedNotLast { index: usize },

    #[error("bracket {index} rate {rate} is outside [0, 1]")]
    RateOutOfRange { index: usize, rate: Decimal },

    /// Every bracket is bounded and income is left over after the last one.
    #[error("bracket table exhausted with {unallocated} income left unallocated")]
    BracketTableExhausted { unallocated: Decimal },

    #[error("total income {0} is negative")]
    NegativeIncome(Decimal),

    #[error("deductions {0} are negative")]
    NegativeDeductions(Decimal),

    #[error("income source '{name}' has negative amount {amount}")]
    NegativeSourceAmount { name: String, amount: Decimal },

    #[error("deductions {deductions} exceed total income {total_income}")]
    DeductionsExceedIncome {
        deductions: Decimal,
        total_income: Decimal,
    },

    #[error("taxable income {taxable_income} does not equal income minus deductions ({expected})")]
    TaxableIncomeMismatch {
        taxable_income: Decimal,
        expected: Decimal,
    },

    #[error("bracket results allocate {allocated} but taxable income is {taxable_income}")]
    AllocationMismatch {
        allocated: Decimal,
        taxable_income: Decimal,
    },

    /// A bracket result carries negative income, or tax outside
    /// `[0, income_in_bracket]`.
    #[error("bracket result {index} has inconsistent income/tax")]
    InconsistentBracketResult { index: usize },

    /// A sum or difference of amounts does not fit in a `Decimal`.
    #[error("amounts overflow the supported decimal range")]
    AmountOverflow,

    #[error("duplicate flow node label '{0}'")]
    DuplicateNodeLabel(String),
}
