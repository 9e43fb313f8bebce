use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    FilingStatus, Schedule, StandardDeductions, TaxBracket, TaxBrackets, TaxTableError,
    TaxTableRegistry, TaxYearTables,
};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading tax table data.
#[derive(Debug, Error)]
pub enum TaxTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid schedule '{schedule}' on row {row}")]
    InvalidSchedule { schedule: String, row: usize },

    #[error("Invalid filing status '{status}' on row {row}")]
    InvalidFilingStatus { status: String, row: usize },

    #[error("No standard deduction for {status} in tax year {tax_year}")]
    MissingDeduction {
        tax_year: i32,
        status: FilingStatus,
    },

    #[error("Standard deduction for {status} in tax year {tax_year} is given more than once")]
    DuplicateDeduction {
        tax_year: i32,
        status: FilingStatus,
    },

    #[error("No brackets for tax year {0}")]
    NoBrackets(i32),

    #[error("Invalid tables for tax year {tax_year}: {source}")]
    InvalidTables {
        tax_year: i32,
        #[source]
        source: TaxTableError,
    },
}

impl From<csv::Error> for TaxTableLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the brackets CSV file.
///
/// - `tax_year`: The tax year (e.g., 2024)
/// - `schedule`: `ordinary` or `qualified`
/// - `filing_status`: `single`, `joint` or `head` (or `S`, `MFJ`, `HOH`)
/// - `rate`: The marginal rate as a decimal (e.g., 0.10 for 10%)
/// - `up_to`: The bracket ceiling (empty for the unbounded top bracket)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub filing_status: String,
    pub rate: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub up_to: Option<Decimal>,
}

/// A single record from the standard deductions CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StandardDeductionRecord {
    pub tax_year: i32,
    pub filing_status: String,
    pub amount: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn parse_status(
    status: &str,
    row: usize,
) -> Result<FilingStatus, TaxTableLoaderError> {
    FilingStatus::parse(status).ok_or_else(|| TaxTableLoaderError::InvalidFilingStatus {
        status: status.to_string(),
        row,
    })
}

fn parse_schedule(
    schedule: &str,
    row: usize,
) -> Result<Schedule, TaxTableLoaderError> {
    Schedule::parse(schedule).ok_or_else(|| TaxTableLoaderError::InvalidSchedule {
        schedule: schedule.to_string(),
        row,
    })
}

fn open(path: &Path) -> Result<File, TaxTableLoaderError> {
    File::open(path).map_err(|e| TaxTableLoaderError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Brackets for one year, accumulated per schedule and filing status.
#[derive(Debug, Default)]
struct YearBrackets {
    ordinary: BTreeMap<FilingStatus, Vec<TaxBracket>>,
    qualified: BTreeMap<FilingStatus, Vec<TaxBracket>>,
}

impl YearBrackets {
    fn push(
        &mut self,
        schedule: Schedule,
        status: FilingStatus,
        bracket: TaxBracket,
    ) {
        let table = match schedule {
            Schedule::Ordinary => &mut self.ordinary,
            Schedule::Qualified => &mut self.qualified,
        };
        table.entry(status).or_default().push(bracket);
    }

    fn into_schedules(mut self) -> (TaxBrackets, TaxBrackets) {
        let ordinary = take_schedule(&mut self.ordinary);
        let qualified = take_schedule(&mut self.qualified);
        (ordinary, qualified)
    }
}

fn take_schedule(table: &mut BTreeMap<FilingStatus, Vec<TaxBracket>>) -> TaxBrackets {
    TaxBrackets {
        single: table.remove(&FilingStatus::Single).unwrap_or_default(),
        joint: table.remove(&FilingStatus::Joint).unwrap_or_default(),
        head: table.remove(&FilingStatus::Head).unwrap_or_default(),
    }
}

/// Loader for tax table data from CSV files.
///
/// Bracket rows are kept in file order within each (year, schedule, filing
/// status) group, so files must list brackets from the lowest ceiling up.
/// Every year is validated as a whole before it is returned.
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TaxTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse standard deduction records from a CSV reader.
    pub fn parse_deductions<R: Read>(
        reader: R
    ) -> Result<Vec<StandardDeductionRecord>, TaxTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: StandardDeductionRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build validated tables for every year that has bracket records.
    ///
    /// Years are returned in ascending order. Row numbers in errors are
    /// 1-based data rows (the header is row 0).
    pub fn build_all(
        brackets: &[TaxBracketRecord],
        deductions: &[StandardDeductionRecord],
    ) -> Result<Vec<TaxYearTables>, TaxTableLoaderError> {
        let mut years: BTreeMap<i32, YearBrackets> = BTreeMap::new();
        for (index, record) in brackets.iter().enumerate() {
            let row = index + 1;
            let schedule = parse_schedule(&record.schedule, row)?;
            let status = parse_status(&record.filing_status, row)?;
            let bracket = TaxBracket {
                rate: record.rate,
                up_to: record.up_to,
            };
            years
                .entry(record.tax_year)
                .or_default()
                .push(schedule, status, bracket);
        }

        let mut amounts: BTreeMap<(i32, FilingStatus), Decimal> = BTreeMap::new();
        for (index, record) in deductions.iter().enumerate() {
            let status = parse_status(&record.filing_status, index + 1)?;
            if amounts
                .insert((record.tax_year, status), record.amount)
                .is_some()
            {
                return Err(TaxTableLoaderError::DuplicateDeduction {
                    tax_year: record.tax_year,
                    status,
                });
            }
        }

        let mut tables = Vec::with_capacity(years.len());
        for (tax_year, year_brackets) in years {
            let deduction = |status: FilingStatus| {
                amounts
                    .get(&(tax_year, status))
                    .copied()
                    .ok_or(TaxTableLoaderError::MissingDeduction { tax_year, status })
            };
            let standard_deductions = StandardDeductions {
                single: deduction(FilingStatus::Single)?,
                joint: deduction(FilingStatus::Joint)?,
                head: deduction(FilingStatus::Head)?,
            };

            let (ordinary, qualified) = year_brackets.into_schedules();
            let year_tables = TaxYearTables::new(tax_year, ordinary, qualified, standard_deductions)
                .map_err(|source| TaxTableLoaderError::InvalidTables { tax_year, source })?;
            debug!(tax_year, "built tax tables");
            tables.push(year_tables);
        }

        Ok(tables)
    }

    /// Build validated tables for a single year.
    pub fn build(
        tax_year: i32,
        brackets: &[TaxBracketRecord],
        deductions: &[StandardDeductionRecord],
    ) -> Result<TaxYearTables, TaxTableLoaderError> {
        let brackets: Vec<_> = brackets
            .iter()
            .filter(|r| r.tax_year == tax_year)
            .cloned()
            .collect();
        let deductions: Vec<_> = deductions
            .iter()
            .filter(|r| r.tax_year == tax_year)
            .cloned()
            .collect();

        Self::build_all(&brackets, &deductions)?
            .pop()
            .ok_or(TaxTableLoaderError::NoBrackets(tax_year))
    }

    /// Read both files and build every year they describe.
    pub fn from_files(
        brackets_path: &Path,
        deductions_path: &Path,
    ) -> Result<Vec<TaxYearTables>, TaxTableLoaderError> {
        let brackets = Self::parse_brackets(open(brackets_path)?)?;
        let deductions = Self::parse_deductions(open(deductions_path)?)?;
        info!(
            brackets = brackets.len(),
            deductions = deductions.len(),
            "parsed tax table files"
        );
        Self::build_all(&brackets, &deductions)
    }

    /// Load every year from both files into `registry`, replacing any year
    /// already present. Returns the years loaded.
    pub fn load_registry(
        registry: &mut TaxTableRegistry,
        brackets_path: &Path,
        deductions_path: &Path,
    ) -> Result<Vec<i32>, TaxTableLoaderError> {
        let tables = Self::from_files(brackets_path, deductions_path)?;
        let years = tables.iter().map(TaxYearTables::tax_year).collect();
        for year_tables in tables {
            registry.insert(year_tables);
        }
        Ok(years)
    }
}
