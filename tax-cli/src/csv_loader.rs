//! CSV loader for batch calculation scenarios.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive and must match exactly.
//!
//! | Column                    | Required | Notes                                     |
//! |---------------------------|----------|-------------------------------------------|
//! | `name`                    | no       | Label for the report; defaults to `row N` |
//! | `filing_status`           | yes      | `single`, `joint`, `head` (or `S`, `MFJ`, `HOH`) |
//! | `wages`                   | no       | Free text, coerced like form input        |
//! | `interest`                | no       |                                           |
//! | `non_qualified_dividends` | no       |                                           |
//! | `qualified_dividends`     | no       |                                           |
//! | `short_term_gains`        | no       |                                           |
//! | `long_term_gains`         | no       |                                           |
//! | `other_income`            | no       |                                           |
//! | `itemized_deduction`      | no       | Empty cell means the standard deduction   |
//!
//! Income cells are not validated here: an unreadable amount counts as zero,
//! exactly as it would when typed into a form.
//!
//! ### Example
//!
//! ```csv
//! name,filing_status,wages,long_term_gains,itemized_deduction
//! salary only,single,60000,,
//! retiree,joint,"$40,000",25000,32000
//! ```

use std::path::Path;

use serde::Deserialize;
use tax_core::{DeductionChoice, FilingStatus, IncomeInputs};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    name: Option<String>,
    filing_status: String,
    #[serde(default)]
    wages: String,
    #[serde(default)]
    interest: String,
    #[serde(default)]
    non_qualified_dividends: String,
    #[serde(default)]
    qualified_dividends: String,
    #[serde(default)]
    short_term_gains: String,
    #[serde(default)]
    long_term_gains: String,
    #[serde(default)]
    other_income: String,
    #[serde(default)]
    itemized_deduction: String,
}

/// One calculation request read from a scenario file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub filing_status: FilingStatus,
    pub inputs: IncomeInputs,
    pub deduction: DeductionChoice,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading scenario data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The underlying CSV deserialisation failed (bad structure, missing
    /// `filing_status` column, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `filing_status` cell contained an unrecognised value. `row` is
    /// 1-based (header = row 0).
    #[error("unrecognised filing status '{status}' on row {row}")]
    InvalidFilingStatus { status: String, row: usize },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Scenario, CsvLoadError> {
    let filing_status = FilingStatus::parse(&row.filing_status).ok_or_else(|| {
        CsvLoadError::InvalidFilingStatus {
            status: row.filing_status.clone(),
            row: row_number,
        }
    })?;

    let name = row
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("row {row_number}"));

    let deduction = if row.itemized_deduction.trim().is_empty() {
        DeductionChoice::Standard
    } else {
        DeductionChoice::itemized(row.itemized_deduction)
    };

    Ok(Scenario {
        name,
        filing_status,
        inputs: IncomeInputs {
            wages: row.wages,
            interest: row.interest,
            non_qualified_dividends: row.non_qualified_dividends,
            qualified_dividends: row.qualified_dividends,
            short_term_gains: row.short_term_gains,
            long_term_gains: row.long_term_gains,
            other_income: row.other_income,
        },
        deduction,
    })
}

/// Parse CSV text and return the scenarios in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] if the CSV is structurally invalid or has no
///   `filing_status` column.
/// * [CsvLoadError::InvalidFilingStatus] if any row has an unrecognised
///   filing status.
pub fn load_from_str(input: &str) -> Result<Vec<Scenario>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &Path) -> Result<Vec<Scenario>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
