use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::InvalidInput;
use crate::calculations::common::max;

/// A named stream of income, e.g. wages or interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSource {
    pub name: String,
    pub amount: Decimal,
}

impl IncomeSource {
    pub fn new(
        name: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// Everything one calculation needs from the input-gathering side.
///
/// Built fresh for every recomputation; nothing is carried between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxInput {
    pub sources: Vec<IncomeSource>,
    pub deductions: Decimal,
}

impl TaxInput {
    pub fn new(
        sources: Vec<IncomeSource>,
        deductions: Decimal,
    ) -> Self {
        Self {
            sources,
            deductions,
        }
    }

    /// Sum of every income source.
    ///
    /// # Errors
    ///
    /// [`InvalidInput::AmountOverflow`] if the sum does not fit in a `Decimal`.
    pub fn total_income(&self) -> Result<Decimal, InvalidInput> {
        self.sources.iter().try_fold(Decimal::ZERO, |total, s| {
            total
                .checked_add(s.amount)
                .ok_or(InvalidInput::AmountOverflow)
        })
    }

    /// Total income minus deductions, floored at zero.
    pub fn taxable_income(&self) -> Result<Decimal, InvalidInput> {
        let taxable = self
            .total_income()?
            .checked_sub(self.deductions)
            .ok_or(InvalidInput::AmountOverflow)?;
        Ok(max(taxable, Decimal::ZERO))
    }

    /// Rejects negative source amounts and negative deductions.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if let Some(source) = self.sources.iter().find(|s| s.amount < Decimal::ZERO) {
            return Err(InvalidInput::NegativeSourceAmount {
                name: source.name.clone(),
                amount: source.amount,
            });
        }
        if self.deductions < Decimal::ZERO {
            return Err(InvalidInput::NegativeDeductions(self.deductions));
        }
        Ok(())
    }
}
