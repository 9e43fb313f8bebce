//! Plain-text rendering of calculation results.

use std::fmt;

use rust_decimal::Decimal;
use tax_core::{BracketSlice, FilingStatus, Schedule, TaxBracket, TaxSummary, TaxYearTables};

use crate::format::{currency, percent, rate};

const LABEL_WIDTH: usize = 24;
const AMOUNT_WIDTH: usize = 14;

/// Full report for a single calculation.
pub struct SummaryReport<'a> {
    pub summary: &'a TaxSummary,
    /// Include the per-bracket breakdown.
    pub detailed: bool,
}

impl<'a> SummaryReport<'a> {
    pub fn new(summary: &'a TaxSummary) -> Self {
        Self {
            summary,
            detailed: false,
        }
    }

    pub fn detailed(mut self) -> Self {
        self.detailed = true;
        self
    }
}

fn line(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: &str,
) -> fmt::Result {
    writeln!(f, "  {label:<LABEL_WIDTH$}{value:>AMOUNT_WIDTH$}")
}

fn breakdown(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    slices: &[BracketSlice],
) -> fmt::Result {
    if slices.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "{title}")?;
    for slice in slices {
        let range = match slice.ceiling {
            Some(ceiling) => format!("{} - {}", currency(slice.floor), currency(ceiling)),
            None => format!("over {}", currency(slice.floor)),
        };
        writeln!(
            f,
            "  {:>5}  {:<24}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}",
            rate(slice.rate),
            range,
            currency(slice.amount),
            currency(slice.tax)
        )?;
    }
    Ok(())
}

impl fmt::Display for SummaryReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = self.summary;
        let r = &s.results;

        writeln!(f, "Tax year {}, {}", s.tax_year, s.filing_status.label())?;
        writeln!(f)?;
        writeln!(f, "Income")?;
        line(f, "Ordinary income", &currency(s.ordinary_income))?;
        line(f, "Qualified income", &currency(s.qualified_income))?;
        line(f, "Total income", &currency(s.total_income))?;
        let deduction_label = if s.used_itemized_deduction {
            "Itemized deduction"
        } else {
            "Standard deduction"
        };
        line(f, deduction_label, &currency(s.deduction))?;

        writeln!(f)?;
        writeln!(f, "Taxable income")?;
        line(f, "Ordinary", &currency(r.taxable_ordinary_income))?;
        line(f, "Qualified", &currency(r.taxable_qualified_income))?;
        line(f, "Total", &currency(s.taxable_income))?;

        if self.detailed {
            breakdown(f, "Ordinary brackets", &s.ordinary_breakdown)?;
            breakdown(f, "Qualified brackets", &s.qualified_breakdown)?;
        }

        writeln!(f)?;
        writeln!(f, "Tax")?;
        line(f, "Ordinary tax", &currency(r.ordinary_tax))?;
        line(f, "Qualified tax", &currency(r.qualified_tax))?;
        line(f, "Total tax", &currency(r.total_tax))?;
        line(f, "Effective rate", &percent(s.effective_rate))?;
        line(f, "Marginal rate", &rate(s.marginal_rate))
    }
}

/// One row per scenario, for batch runs.
pub struct BatchTable<'a> {
    pub rows: &'a [(String, TaxSummary)],
}

impl fmt::Display for BatchTable<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name_width = self
            .rows
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Scenario".len());

        writeln!(
            f,
            "{:<name_width$}  {:<24}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>10}",
            "Scenario", "Filing status", "Taxable", "Total tax", "Effective"
        )?;
        for (name, s) in self.rows {
            writeln!(
                f,
                "{:<name_width$}  {:<24}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>10}",
                name,
                s.filing_status.label(),
                currency(s.taxable_income),
                currency(s.results.total_tax),
                percent(s.effective_rate)
            )?;
        }
        Ok(())
    }
}

/// Rate schedules and standard deductions for one year.
pub struct TablesReport<'a> {
    pub tables: &'a TaxYearTables,
    pub statuses: Vec<FilingStatus>,
}

fn schedule(
    f: &mut fmt::Formatter<'_>,
    schedule: Schedule,
    brackets: &[TaxBracket],
) -> fmt::Result {
    writeln!(f, "  {schedule}")?;
    let mut floor = Decimal::ZERO;
    for bracket in brackets {
        match bracket.up_to {
            Some(ceiling) => {
                let range = format!("{} - {}", currency(floor), currency(ceiling));
                writeln!(f, "    {:>5}  {range}", rate(bracket.rate))?;
                floor = ceiling;
            }
            None => writeln!(f, "    {:>5}  over {}", rate(bracket.rate), currency(floor))?,
        }
    }
    Ok(())
}

impl fmt::Display for TablesReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let tables = self.tables;
        for (index, status) in self.statuses.iter().copied().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "Tax year {}, {}", tables.tax_year(), status.label())?;
            line(f, "Standard deduction", &currency(tables.standard_deduction(status)))?;
            schedule(f, Schedule::Ordinary, tables.ordinary_brackets(status))?;
            schedule(f, Schedule::Qualified, tables.qualified_brackets(status))?;
        }
        Ok(())
    }
}
