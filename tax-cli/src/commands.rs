//! Rendering for each `taxcalc` subcommand. Every function returns the text
//! to print, either the plain report or pretty JSON.

use serde::Serialize;
use tax_core::{
    DeductionChoice, FilingStatus, IncomeInputs, TaxCalculator, TaxSummary, TaxYearTables,
};
use tracing::{debug, info};

use crate::csv_loader::Scenario;
use crate::report::{BatchTable, SummaryReport, TablesReport};

#[derive(Serialize)]
struct NamedSummary<'a> {
    name: &'a str,
    #[serde(flatten)]
    summary: &'a TaxSummary,
}

/// One calculation.
pub fn compute(
    calculator: &TaxCalculator<'_>,
    status: FilingStatus,
    inputs: &IncomeInputs,
    deduction: &DeductionChoice,
    detailed: bool,
    json: bool,
) -> serde_json::Result<String> {
    let summary = calculator.calculate(inputs, status, deduction);
    info!(
        status = %status,
        total_tax = %summary.results.total_tax,
        "calculated tax"
    );

    if json {
        return serde_json::to_string_pretty(&summary).map(|s| s + "\n");
    }
    let report = SummaryReport::new(&summary);
    let report = if detailed { report.detailed() } else { report };
    Ok(report.to_string())
}

/// Every scenario, in order.
pub fn batch(
    calculator: &TaxCalculator<'_>,
    scenarios: Vec<Scenario>,
    json: bool,
) -> serde_json::Result<String> {
    let rows: Vec<(String, TaxSummary)> = scenarios
        .into_iter()
        .map(|scenario| {
            debug!(name = %scenario.name, "calculating scenario");
            let summary =
                calculator.calculate(&scenario.inputs, scenario.filing_status, &scenario.deduction);
            (scenario.name, summary)
        })
        .collect();

    if json {
        let named: Vec<_> = rows
            .iter()
            .map(|(name, summary)| NamedSummary { name, summary })
            .collect();
        return serde_json::to_string_pretty(&named).map(|s| s + "\n");
    }
    Ok(BatchTable { rows: &rows }.to_string())
}

/// Tables for one filing status, or all of them.
pub fn tables(
    tables: &TaxYearTables,
    status: Option<FilingStatus>,
    json: bool,
) -> serde_json::Result<String> {
    if json {
        return serde_json::to_string_pretty(tables).map(|s| s + "\n");
    }
    let statuses = match status {
        Some(status) => vec![status],
        None => FilingStatus::ALL.to_vec(),
    };
    Ok(TablesReport { tables, statuses }.to_string())
}
