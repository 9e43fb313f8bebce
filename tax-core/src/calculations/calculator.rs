//! The end-to-end calculation.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Coerce the seven income fields and split them into ordinary and qualified income |
//! | 2    | Resolve the deduction (standard for the filing status, or itemized) |
//! | 3    | Shrink both income streams by `deduction / total_income`, clamping at zero |
//! | 4    | Tax ordinary taxable income on the ordinary schedule |
//! | 5    | Tax qualified taxable income on the preferential schedule, stacked above step 4's income |
//! | 6    | Total tax, taxable income, effective and marginal rates |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::common::round_half_up;
//! use tax_core::{DeductionChoice, FilingStatus, IncomeInputs, TaxCalculator, tax_year_2024};
//!
//! let inputs = IncomeInputs {
//!     wages: "60000".to_string(),
//!     ..IncomeInputs::default()
//! };
//!
//! let calculator = TaxCalculator::new(tax_year_2024());
//! let summary = calculator.calculate(&inputs, FilingStatus::Single, &DeductionChoice::Standard);
//!
//! assert_eq!(round_half_up(summary.taxable_income), dec!(45400.00));
//! assert_eq!(round_half_up(summary.results.total_tax), dec!(5216.00));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::brackets::{BracketTax, ordinary_tax, stacked_tax};
use crate::calculations::common::ratio_or_zero;
use crate::calculations::deduction::{self, Deduction, DeductionAllocation};
use crate::calculations::income::{self, IncomeTotals};
use crate::{DeductionChoice, FilingStatus, IncomeInputs, TaxResults, TaxSummary, TaxYearTables};

const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Computes the core results for one set of inputs.
///
/// Shorthand for [`TaxCalculator::calculate`] when only the five result
/// figures are needed.
pub fn compute_tax(
    inputs: &IncomeInputs,
    filing_status: FilingStatus,
    deduction: &DeductionChoice,
    tables: &TaxYearTables,
) -> TaxResults {
    TaxCalculator::new(tables)
        .calculate(inputs, filing_status, deduction)
        .results
}

/// Calculator bound to one year's tables.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    tables: &'a TaxYearTables,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(tables: &'a TaxYearTables) -> Self {
        Self { tables }
    }

    /// Runs the whole pipeline. Never fails: unreadable fields count as zero
    /// and zero denominators give zero ratios.
    pub fn calculate(
        &self,
        inputs: &IncomeInputs,
        filing_status: FilingStatus,
        deduction_choice: &DeductionChoice,
    ) -> TaxSummary {
        let totals = income::aggregate(&inputs.amounts());
        let deduction = deduction::resolve(deduction_choice, filing_status, self.tables);
        let allocation = deduction::allocate(&totals, deduction.amount);

        let ordinary = self.ordinary(allocation.taxable_ordinary, filing_status);
        let qualified = self.qualified(&allocation, filing_status);

        let summary = self.summarize(filing_status, totals, deduction, allocation, ordinary, qualified);
        debug!(
            tax_year = summary.tax_year,
            filing_status = %filing_status,
            total_income = %summary.total_income,
            taxable_income = %summary.taxable_income,
            total_tax = %summary.results.total_tax,
            "calculated tax"
        );
        summary
    }

    fn ordinary(
        &self,
        taxable_ordinary: Decimal,
        filing_status: FilingStatus,
    ) -> BracketTax {
        ordinary_tax(taxable_ordinary, self.tables.ordinary_brackets(filing_status))
    }

    fn qualified(
        &self,
        allocation: &DeductionAllocation,
        filing_status: FilingStatus,
    ) -> BracketTax {
        stacked_tax(
            allocation.taxable_qualified,
            allocation.taxable_ordinary,
            self.tables.qualified_brackets(filing_status),
        )
    }

    fn summarize(
        &self,
        filing_status: FilingStatus,
        totals: IncomeTotals,
        deduction: Deduction,
        allocation: DeductionAllocation,
        ordinary: BracketTax,
        qualified: BracketTax,
    ) -> TaxSummary {
        let results = TaxResults {
            ordinary_tax: ordinary.tax,
            qualified_tax: qualified.tax,
            total_tax: ordinary.tax + qualified.tax,
            taxable_ordinary_income: allocation.taxable_ordinary,
            taxable_qualified_income: allocation.taxable_qualified,
        };
        let taxable_income = results.taxable_ordinary_income + results.taxable_qualified_income;

        TaxSummary {
            tax_year: self.tables.tax_year(),
            filing_status,
            ordinary_income: totals.ordinary,
            qualified_income: totals.qualified,
            total_income: totals.total(),
            deduction: deduction.amount,
            used_itemized_deduction: deduction.itemized,
            results,
            taxable_income,
            effective_rate: effective_rate(results.total_tax, taxable_income),
            marginal_rate: ordinary.top_rate(),
            ordinary_breakdown: ordinary.slices,
            qualified_breakdown: qualified.slices,
        }
    }
}

/// Total tax as a percentage of taxable income, zero without taxable income.
fn effective_rate(
    total_tax: Decimal,
    taxable_income: Decimal,
) -> Decimal {
    if taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    ratio_or_zero(total_tax, taxable_income) * PERCENT
}
