//! Per-year reference data: ordinary brackets, qualified brackets and
//! standard deductions.
//!
//! A [`TaxYearTables`] value is only obtainable through
//! [`TaxYearTables::new`], which validates every schedule, so the
//! calculation pipeline can walk brackets without re-checking them.
//! Deserialization goes through `new` as well.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{FilingStatus, StandardDeductions, TaxBracket, TaxBrackets};

/// Which bracket schedule a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    Ordinary,
    Qualified,
}

impl Schedule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ordinary => "ordinary",
            Self::Qualified => "qualified",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ordinary" => Some(Self::Ordinary),
            "qualified" | "preferential" => Some(Self::Qualified),
            _ => None,
        }
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when a year's tables are malformed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxTableError {
    #[error("{schedule} schedule for {status} has no brackets")]
    EmptySchedule {
        schedule: Schedule,
        status: FilingStatus,
    },

    #[error("{schedule} schedule for {status}: rate {rate} at bracket {index} is outside 0..=1")]
    RateOutOfRange {
        schedule: Schedule,
        status: FilingStatus,
        index: usize,
        rate: Decimal,
    },

    #[error(
        "{schedule} schedule for {status}: ceiling {ceiling} at bracket {index} does not exceed the previous ceiling {previous}"
    )]
    NonIncreasingCeiling {
        schedule: Schedule,
        status: FilingStatus,
        index: usize,
        ceiling: Decimal,
        previous: Decimal,
    },

    #[error("{schedule} schedule for {status}: only the last bracket may be unbounded (bracket {index})")]
    UnboundedBeforeTop {
        schedule: Schedule,
        status: FilingStatus,
        index: usize,
    },

    #[error("{schedule} schedule for {status}: top bracket must be unbounded")]
    BoundedTopBracket {
        schedule: Schedule,
        status: FilingStatus,
    },

    #[error("standard deduction for {status} is negative: {amount}")]
    NegativeDeduction { status: FilingStatus, amount: Decimal },
}

/// Reference data for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedTables")]
pub struct TaxYearTables {
    tax_year: i32,
    ordinary: TaxBrackets,
    qualified: TaxBrackets,
    standard_deductions: StandardDeductions,
}

/// Wire form of [`TaxYearTables`] before validation.
#[derive(Deserialize)]
struct UncheckedTables {
    tax_year: i32,
    ordinary: TaxBrackets,
    qualified: TaxBrackets,
    standard_deductions: StandardDeductions,
}

impl TryFrom<UncheckedTables> for TaxYearTables {
    type Error = TaxTableError;

    fn try_from(raw: UncheckedTables) -> Result<Self, Self::Error> {
        Self::new(raw.tax_year, raw.ordinary, raw.qualified, raw.standard_deductions)
    }
}

impl TaxYearTables {
    /// Builds a validated set of tables.
    ///
    /// # Errors
    ///
    /// Returns [`TaxTableError`] if any schedule is empty, has a rate outside
    /// `[0, 1]`, has ceilings that are not strictly increasing, does not end
    /// in exactly one unbounded bracket, or if a standard deduction is
    /// negative.
    pub fn new(
        tax_year: i32,
        ordinary: TaxBrackets,
        qualified: TaxBrackets,
        standard_deductions: StandardDeductions,
    ) -> Result<Self, TaxTableError> {
        let tables = Self {
            tax_year,
            ordinary,
            qualified,
            standard_deductions,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Builds tables from data that is valid by construction. Only used for
    /// the compiled-in years, which are checked by unit tests.
    pub(crate) fn from_static(
        tax_year: i32,
        ordinary: TaxBrackets,
        qualified: TaxBrackets,
        standard_deductions: StandardDeductions,
    ) -> Self {
        Self {
            tax_year,
            ordinary,
            qualified,
            standard_deductions,
        }
    }

    pub fn tax_year(&self) -> i32 {
        self.tax_year
    }

    pub fn ordinary_brackets(
        &self,
        status: FilingStatus,
    ) -> &[TaxBracket] {
        self.ordinary.for_status(status)
    }

    pub fn qualified_brackets(
        &self,
        status: FilingStatus,
    ) -> &[TaxBracket] {
        self.qualified.for_status(status)
    }

    pub fn standard_deduction(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        self.standard_deductions.for_status(status)
    }

    /// Checks every schedule and deduction.
    ///
    /// # Errors
    ///
    /// See [`TaxYearTables::new`].
    pub fn validate(&self) -> Result<(), TaxTableError> {
        for status in FilingStatus::ALL {
            validate_schedule(Schedule::Ordinary, status, self.ordinary.for_status(status))?;
            validate_schedule(Schedule::Qualified, status, self.qualified.for_status(status))?;

            let amount = self.standard_deductions.for_status(status);
            if amount < Decimal::ZERO {
                return Err(TaxTableError::NegativeDeduction { status, amount });
            }
        }
        Ok(())
    }
}

fn validate_schedule(
    schedule: Schedule,
    status: FilingStatus,
    brackets: &[TaxBracket],
) -> Result<(), TaxTableError> {
    let Some(last) = brackets.len().checked_sub(1) else {
        return Err(TaxTableError::EmptySchedule { schedule, status });
    };

    let mut previous = Decimal::ZERO;
    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(TaxTableError::RateOutOfRange {
                schedule,
                status,
                index,
                rate: bracket.rate,
            });
        }

        match bracket.up_to {
            Some(_) if index == last => {
                return Err(TaxTableError::BoundedTopBracket { schedule, status });
            }
            Some(ceiling) if ceiling <= previous => {
                return Err(TaxTableError::NonIncreasingCeiling {
                    schedule,
                    status,
                    index,
                    ceiling,
                    previous,
                });
            }
            Some(ceiling) => previous = ceiling,
            None if index != last => {
                return Err(TaxTableError::UnboundedBeforeTop {
                    schedule,
                    status,
                    index,
                });
            }
            None => {}
        }
    }

    Ok(())
}
