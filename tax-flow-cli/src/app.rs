use std::fs;
use std::io::Write;

use anyhow::{Context, Result, bail};
use tax_core::{Bracket, TaxFlowReport, TaxInput};
use tax_data::{
    BracketTableLoader, IncomeSourceLoader, default_brackets, parse_amount, parse_inline_source,
};
use tracing::{debug, info};

use crate::cli::{Cli, MAX_SOURCES, OutputFormat};
use crate::render::{render_json, render_summary};

/// Collects income sources (file first, then inline) and deductions.
pub fn gather_input(cli: &Cli) -> Result<TaxInput> {
    let mut sources = Vec::new();

    if let Some(path) = &cli.income {
        let loaded = IncomeSourceLoader::load_from_file(path)
            .with_context(|| format!("Failed to load income sources: {}", path.display()))?;
        debug!(count = loaded.len(), path = %path.display(), "loaded income sources");
        sources.extend(loaded);
    }

    for raw in &cli.sources {
        sources.push(parse_inline_source(raw).with_context(|| format!("Invalid --source '{raw}'"))?);
    }

    if sources.is_empty() {
        bail!("at least one income source is required (use --income or --source)");
    }
    if sources.len() > MAX_SOURCES {
        bail!(
            "{} income sources given; at most {MAX_SOURCES} are supported",
            sources.len()
        );
    }

    let deductions = parse_amount(&cli.deductions).context("Invalid --deductions")?;

    Ok(TaxInput::new(sources, deductions))
}

/// The bracket table from `--brackets`, or the built-in default.
pub fn load_brackets(cli: &Cli) -> Result<Vec<Bracket>> {
    match &cli.brackets {
        Some(path) => BracketTableLoader::load_from_file(path)
            .with_context(|| format!("Failed to load bracket table: {}", path.display())),
        None => {
            debug!("using built-in 2023 Married Filing Jointly brackets");
            Ok(default_brackets())
        }
    }
}

/// Runs one calculation and writes the requested output to `out` (or the JSON
/// payload to `--output`).
pub fn run<W: Write>(
    cli: &Cli,
    out: &mut W,
) -> Result<()> {
    let input = gather_input(cli)?;
    let brackets = load_brackets(cli)?;

    let report = TaxFlowReport::calculate(&input, &brackets).context("Calculation failed")?;

    if matches!(cli.format, OutputFormat::Summary | OutputFormat::Both) {
        write!(out, "{}", render_summary(&report, &input.sources))?;
    }
    if matches!(cli.format, OutputFormat::Json | OutputFormat::Both) {
        let json = render_json(&report, &input.sources).context("Failed to serialize flow")?;
        match &cli.output {
            Some(path) => {
                fs::write(path, &json)
                    .with_context(|| format!("Failed to write: {}", path.display()))?;
                info!(path = %path.display(), "wrote flow graph");
            }
            None => writeln!(out, "{json}")?,
        }
    }

    Ok(())
}
