//! Text and JSON renderings of a [`TaxFlowReport`].

use std::fmt;

use serde::Serialize;
use tax_core::calculations::common::format_currency;
use tax_core::{IncomeSource, SankeyData, TaxFlowReport, TaxSummary};

/// JSON document handed to a Sankey renderer.
#[derive(Debug, Serialize)]
pub struct FlowExport<'a> {
    pub title: &'static str,
    pub income_sources: &'a [IncomeSource],
    pub sankey: SankeyData,
    pub summary: TaxSummary,
}

impl<'a> FlowExport<'a> {
    pub fn new(
        report: &TaxFlowReport,
        income_sources: &'a [IncomeSource],
    ) -> Self {
        Self {
            title: "Tax Flow Sankey Diagram",
            income_sources,
            sankey: report.graph.to_sankey(),
            summary: report.summary(),
        }
    }
}

pub fn render_json(
    report: &TaxFlowReport,
    income_sources: &[IncomeSource],
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&FlowExport::new(report, income_sources))
}

/// Income sources, per-bracket breakdown and headline figures.
pub struct SummaryView<'a> {
    report: &'a TaxFlowReport,
    income_sources: &'a [IncomeSource],
}

impl<'a> SummaryView<'a> {
    pub fn new(
        report: &'a TaxFlowReport,
        income_sources: &'a [IncomeSource],
    ) -> Self {
        Self {
            report,
            income_sources,
        }
    }
}

impl fmt::Display for SummaryView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Income Sources")?;
        for source in self.income_sources {
            writeln!(
                f,
                "  {:<32}{:>18}",
                source.name,
                format_currency(source.amount)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Bracket Breakdown")?;
        if self.report.allocation.results.is_empty() {
            writeln!(f, "  (no taxable income)")?;
        }
        for r in &self.report.allocation.results {
            writeln!(
                f,
                "  {:<32}{:>18}{:>16}",
                r.label(),
                format_currency(r.income_in_bracket),
                format_currency(r.tax_in_bracket)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "{}", self.report.summary())
    }
}

pub fn render_summary(
    report: &TaxFlowReport,
    income_sources: &[IncomeSource],
) -> String {
    SummaryView::new(report, income_sources).to_string()
}
