//! Loading income sources.
//!
//! ## CSV Format
//!
//! | Column   | Required | Type    | Notes                                       |
//! |----------|----------|---------|---------------------------------------------|
//! | `name`   | no       | string  | Blank names become `Income Source <row>`    |
//! | `amount` | yes      | decimal | `95000`, `95,000.00` (quoted) or `$95000`   |
//!
//! ```csv
//! name,amount
//! Wages,95000.00
//! Consulting,"35,000"
//! ```
//!
//! Sources can also be given inline as `NAME=AMOUNT`, see
//! [`parse_inline_source`].

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::IncomeSource;
use thiserror::Error;

use crate::amount::{ParseAmountError, parse_amount};

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: Option<String>,
    amount: String,
}

/// Errors that can occur while loading income sources.
#[derive(Debug, Error)]
pub enum IncomeSourceLoaderError {
    /// The CSV is structurally invalid or a required column is missing.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based (header = row 0).
    #[error("row {row}: {source}")]
    InvalidAmount {
        row: usize,
        #[source]
        source: ParseAmountError,
    },

    #[error("row {row}: income source '{name}' has a negative amount")]
    NegativeAmount { name: String, row: usize },

    #[error("invalid income source '{input}': expected NAME=AMOUNT")]
    InvalidInlineSource { input: String },

    #[error("cannot read income file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn default_name(row: usize) -> String {
    format!("Income Source {row}")
}

/// Convert a single CSV row. `row_number` is 1-based.
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<IncomeSource, IncomeSourceLoaderError> {
    let amount = parse_amount(&row.amount).map_err(|source| {
        IncomeSourceLoaderError::InvalidAmount {
            row: row_number,
            source,
        }
    })?;
    let name = row
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| default_name(row_number));

    if amount < Decimal::ZERO {
        return Err(IncomeSourceLoaderError::NegativeAmount {
            name,
            row: row_number,
        });
    }

    Ok(IncomeSource { name, amount })
}

/// Parses `NAME=AMOUNT` (e.g. `Wages=95,000`). The split is on the last `=`,
/// so names may contain `=`.
pub fn parse_inline_source(input: &str) -> Result<IncomeSource, IncomeSourceLoaderError> {
    let invalid = || IncomeSourceLoaderError::InvalidInlineSource {
        input: input.to_string(),
    };

    let (name, amount) = input.rsplit_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() || amount.trim().is_empty() {
        return Err(invalid());
    }

    let amount = parse_amount(amount).map_err(|_| invalid())?;
    if amount < Decimal::ZERO {
        return Err(IncomeSourceLoaderError::NegativeAmount {
            name: name.to_string(),
            row: 0,
        });
    }

    Ok(IncomeSource::new(name, amount))
}

pub struct IncomeSourceLoader;

impl IncomeSourceLoader {
    /// Parse CSV text and return the income sources in file order.
    ///
    /// # Errors
    ///
    /// * [`IncomeSourceLoaderError::Parse`] if the CSV is structurally invalid
    /// * [`IncomeSourceLoaderError::InvalidAmount`] if an amount cannot be parsed
    /// * [`IncomeSourceLoaderError::NegativeAmount`] if an amount is below zero
    pub fn load_from_str(input: &str) -> Result<Vec<IncomeSource>, IncomeSourceLoaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(input.as_bytes());

        reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(idx, result)| convert_row(result?, idx + 1))
            .collect()
    }

    /// Read a file from disk and delegate to [`Self::load_from_str`].
    pub fn load_from_file(path: &Path) -> Result<Vec<IncomeSource>, IncomeSourceLoaderError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| IncomeSourceLoaderError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::load_from_str(&contents)
    }
}
