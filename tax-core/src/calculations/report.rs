//! End-to-end calculation for a [`TaxInput`].

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculations::common::{format_currency, format_percent};
use crate::calculations::{Allocation, InvalidInput, allocate, build_flow};
use crate::{Bracket, FlowGraph, TaxInput};

/// Headline figures of one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    pub total_income: Decimal,
    pub deductions: Decimal,
    pub taxable_income: Decimal,
    pub total_tax: Decimal,
    pub amount_kept: Decimal,
    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,
}

impl fmt::Display for TaxSummary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Total Income:    {}", format_currency(self.total_income))?;
        writeln!(f, "Deductions:      {}", format_currency(self.deductions))?;
        writeln!(f, "Taxable Income:  {}", format_currency(self.taxable_income))?;
        writeln!(f, "Total Tax Paid:  {}", format_currency(self.total_tax))?;
        writeln!(f, "Amount Kept:     {}", format_currency(self.amount_kept))?;
        writeln!(f, "Effective Rate:  {}", format_percent(self.effective_rate))?;
        write!(f, "Marginal Rate:   {}", format_percent(self.marginal_rate))
    }
}

/// Allocation and flow graph for one [`TaxInput`] against one bracket table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxFlowReport {
    pub total_income: Decimal,
    pub deductions: Decimal,
    pub taxable_income: Decimal,
    pub allocation: Allocation,
    pub graph: FlowGraph,
}

impl TaxFlowReport {
    /// Sums the income sources, floors taxable income at zero, allocates it
    /// across `brackets` and builds the flow graph.
    ///
    /// When deductions exceed total income only the usable part (equal to
    /// total income) flows through `Deductions`; the reported `deductions`
    /// keep the value that was entered.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput`] for negative amounts, amounts whose sum
    /// overflows, or a malformed bracket table.
    pub fn calculate(
        input: &TaxInput,
        brackets: &[Bracket],
    ) -> Result<Self, InvalidInput> {
        input.validate()?;

        let total_income = input.total_income()?;
        let taxable_income = input.taxable_income()?;

        let flow_deductions = if input.deductions > total_income {
            warn!(
                deductions = %input.deductions,
                total_income = %total_income,
                "deductions exceed income; capping deduction flow at total income"
            );
            total_income
        } else {
            input.deductions
        };

        let allocation = allocate(taxable_income, brackets)?;
        let graph = build_flow(
            total_income,
            flow_deductions,
            taxable_income,
            &allocation.results,
        )?;

        info!(
            sources = input.sources.len(),
            total_income = %total_income,
            taxable_income = %taxable_income,
            total_tax = %allocation.total_tax,
            brackets = allocation.results.len(),
            "calculated tax flow"
        );

        Ok(Self {
            total_income,
            deductions: input.deductions,
            taxable_income,
            allocation,
            graph,
        })
    }

    pub fn total_tax(&self) -> Decimal {
        self.allocation.total_tax
    }

    /// Total income minus total tax.
    pub fn amount_kept(&self) -> Decimal {
        self.total_income - self.total_tax()
    }

    /// Total tax as a fraction of total income; zero when there is no income.
    pub fn effective_rate(&self) -> Decimal {
        if self.total_income.is_zero() {
            Decimal::ZERO
        } else {
            self.total_tax() / self.total_income
        }
    }

    pub fn summary(&self) -> TaxSummary {
        TaxSummary {
            total_income: self.total_income,
            deductions: self.deductions,
            taxable_income: self.taxable_income,
            total_tax: self.total_tax(),
            amount_kept: self.amount_kept(),
            effective_rate: self.effective_rate(),
            marginal_rate: self.allocation.marginal_rate(),
        }
    }
}
