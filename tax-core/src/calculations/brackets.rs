//! Marginal bracket engines.
//!
//! [`ordinary_tax`] walks a schedule from the bottom, filling each bracket in
//! turn. [`stacked_tax`] places qualified income on top of ordinary taxable
//! income: preferential brackets already filled by ordinary income are
//! skipped, and the first partially filled bracket only offers the room left
//! above the ordinary amount.
//!
//! Both engines expect a validated schedule (ascending ceilings, unbounded
//! top bracket), as guaranteed by [`crate::TaxYearTables`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BracketSlice, TaxBracket};

/// Tax owed on one stream and how it was spread over the brackets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    pub tax: Decimal,
    pub slices: Vec<BracketSlice>,
}

impl BracketTax {
    /// Rate of the highest bracket that received income, zero if none did.
    pub fn top_rate(&self) -> Decimal {
        self.slices.last().map_or(Decimal::ZERO, |slice| slice.rate)
    }

    /// Total income placed across all slices.
    pub fn taxed_amount(&self) -> Decimal {
        self.slices.iter().map(|slice| slice.amount).sum()
    }

    fn push(
        &mut self,
        bracket: &TaxBracket,
        floor: Decimal,
        amount: Decimal,
    ) {
        let tax = amount * bracket.rate;
        self.tax += tax;
        self.slices.push(BracketSlice {
            rate: bracket.rate,
            floor,
            ceiling: bracket.up_to,
            amount,
            tax,
        });
    }
}

/// Taxes `taxable_income` marginally across `brackets`.
///
/// Iteration stops as soon as a bracket would receive nothing, so income
/// exactly at a ceiling never produces an empty slice for the next bracket.
pub fn ordinary_tax(
    taxable_income: Decimal,
    brackets: &[TaxBracket],
) -> BracketTax {
    let mut result = BracketTax::default();
    let mut remaining = taxable_income;
    let mut floor = Decimal::ZERO;

    for bracket in brackets {
        let amount = match bracket.width(floor) {
            Some(width) => remaining.min(width),
            None => remaining,
        };
        if amount <= Decimal::ZERO {
            break;
        }

        result.push(bracket, floor, amount);
        remaining -= amount;
        if let Some(ceiling) = bracket.up_to {
            floor = ceiling;
        }
    }

    result
}

/// Taxes `taxable_qualified` at preferential rates, stacked on top of
/// `taxable_ordinary`.
///
/// Returns zero tax when there is no qualified income, whatever the
/// ordinary amount.
pub fn stacked_tax(
    taxable_qualified: Decimal,
    taxable_ordinary: Decimal,
    brackets: &[TaxBracket],
) -> BracketTax {
    let mut result = BracketTax::default();
    if taxable_qualified <= Decimal::ZERO {
        return result;
    }

    let mut stacked = taxable_ordinary;
    let mut remaining = taxable_qualified;
    let mut previous = Decimal::ZERO;

    for bracket in brackets {
        // Brackets fully consumed by ordinary income.
        if let Some(ceiling) = bracket.up_to.filter(|ceiling| *ceiling <= stacked) {
            previous = ceiling;
            continue;
        }

        let start = stacked.max(previous);
        let amount = match bracket.width(start) {
            Some(available) => remaining.min(available),
            None => remaining,
        };
        if amount <= Decimal::ZERO {
            break;
        }

        result.push(bracket, start, amount);
        remaining -= amount;
        stacked += amount;
        if let Some(ceiling) = bracket.up_to {
            previous = ceiling;
        }
    }

    result
}
