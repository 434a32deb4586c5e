use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tax_core::calculations::validate_brackets;
use tax_core::{Bracket, InvalidInput};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a bracket table.
#[derive(Debug, Error)]
pub enum BracketTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read bracket table '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bracket table is empty")]
    Empty,

    #[error("invalid bracket table: {0}")]
    InvalidTable(#[from] InvalidInput),
}

impl From<csv::Error> for BracketTableLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a bracket table CSV.
///
/// - `upper_limit`: exclusive upper bound of the bracket; empty, `inf` or
///   `unbounded` for the open-ended top bracket
/// - `rate`: the marginal rate as a fraction (e.g., 0.10 for 10%)
///
/// Rows must be in ascending order; each bracket starts where the previous
/// one ended.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    #[serde(deserialize_with = "deserialize_upper_limit")]
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
}

impl From<&BracketRecord> for Bracket {
    fn from(record: &BracketRecord) -> Self {
        Bracket {
            upper_limit: record.upper_limit,
            rate: record.rate,
        }
    }
}

fn deserialize_upper_limit<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("inf") || s.eq_ignore_ascii_case("unbounded") => {
            Ok(None)
        }
        Some(s) => s
            .replace(',', "")
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Loader for bracket tables stored as CSV.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse and validate a bracket table.
    ///
    /// The table must be non-empty, strictly ascending, with rates in
    /// `[0, 1]`, and only the last row may be open-ended.
    pub fn load<R: Read>(reader: R) -> Result<Vec<Bracket>, BracketTableLoaderError> {
        let records = Self::parse(reader)?;
        if records.is_empty() {
            return Err(BracketTableLoaderError::Empty);
        }

        let brackets: Vec<Bracket> = records.iter().map(Bracket::from).collect();
        validate_brackets(&brackets)?;

        debug!(brackets = brackets.len(), "loaded bracket table");
        Ok(brackets)
    }

    /// Convenience wrapper: open a file and delegate to [`Self::load`].
    pub fn load_from_file(path: &Path) -> Result<Vec<Bracket>, BracketTableLoaderError> {
        let file = File::open(path).map_err(|source| BracketTableLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load(file)
    }
}

/// The 2023 Married Filing Jointly federal table, used when no table is
/// supplied.
pub fn default_brackets() -> Vec<Bracket> {
    vec![
        Bracket::bounded(dec!(22000), dec!(0.10)),
        Bracket::bounded(dec!(89450), dec!(0.12)),
        Bracket::bounded(dec!(190750), dec!(0.22)),
        Bracket::bounded(dec!(364200), dec!(0.24)),
        Bracket::bounded(dec!(462500), dec!(0.32)),
        Bracket::bounded(dec!(693750), dec!(0.35)),
        Bracket::unbounded(dec!(0.37)),
    ]
}
