use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Most income sources a single calculation accepts.
pub const MAX_SOURCES: usize = 10;

/// What `tax-flow` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary and per-bracket breakdown.
    #[default]
    Summary,
    /// Sankey payload (labels, sources, targets, values) and summary as JSON.
    Json,
    /// Summary followed by the JSON payload.
    Both,
}

/// Tax flow calculator.
///
/// Sums income sources, applies deductions, splits the taxable remainder
/// across a progressive bracket table and describes where every dollar goes
/// as a flow graph ready for a Sankey renderer.
#[derive(Debug, Parser)]
#[command(name = "tax-flow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// CSV file of income sources with `name,amount` columns.
    #[arg(short, long)]
    pub income: Option<PathBuf>,

    /// Inline income source as NAME=AMOUNT (repeatable).
    #[arg(short, long = "source", value_name = "NAME=AMOUNT")]
    pub sources: Vec<String>,

    /// Total deductions, e.g. `27,700`.
    #[arg(short, long, default_value = "0")]
    pub deductions: String,

    /// CSV file of `upper_limit,rate` rows. Defaults to the 2023 Married
    /// Filing Jointly table.
    #[arg(short, long)]
    pub brackets: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Write the JSON payload to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
