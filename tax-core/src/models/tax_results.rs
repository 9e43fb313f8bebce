use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// Output of one computation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResults {
    pub ordinary_tax: Decimal,
    pub qualified_tax: Decimal,
    pub total_tax: Decimal,
    pub taxable_ordinary_income: Decimal,
    pub taxable_qualified_income: Decimal,
}

/// The portion of income that fell into a single bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub rate: Decimal,
    /// Income level at which this slice starts.
    pub floor: Decimal,
    /// Bracket ceiling, `None` for the unbounded top bracket.
    pub ceiling: Option<Decimal>,
    pub amount: Decimal,
    pub tax: Decimal,
}

/// Full result of a calculation, including the figures derived for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    pub tax_year: i32,
    pub filing_status: FilingStatus,

    pub ordinary_income: Decimal,
    pub qualified_income: Decimal,
    pub total_income: Decimal,

    /// Deduction amount applied across both income streams.
    pub deduction: Decimal,
    pub used_itemized_deduction: bool,

    pub results: TaxResults,

    /// Taxable ordinary plus taxable qualified income.
    pub taxable_income: Decimal,
    /// Total tax as a percentage of taxable income.
    pub effective_rate: Decimal,
    /// Rate of the highest ordinary bracket that received income.
    pub marginal_rate: Decimal,

    pub ordinary_breakdown: Vec<BracketSlice>,
    pub qualified_breakdown: Vec<BracketSlice>,
}
