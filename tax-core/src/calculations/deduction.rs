//! Deduction selection and allocation.
//!
//! The deduction is not taken from ordinary income first. It is spread over
//! both income streams by a single ratio, `deduction / total_income`, and
//! each stream is shrunk by that ratio and clamped at zero on its own:
//!
//! ```text
//! ratio              = total_income > 0 ? deduction / total_income : 0
//! taxable_ordinary   = max(0, ordinary  * (1 - ratio))
//! taxable_qualified  = max(0, qualified * (1 - ratio))
//! ```
//!
//! This proportional model differs from the statutory ordering, where the
//! deduction reduces ordinary income first. A deduction larger than total
//! income gives a ratio above one; both streams then clamp to zero and the
//! unused deduction is not carried anywhere.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{coerce_amount, non_negative};
use crate::calculations::income::IncomeTotals;
use crate::{DeductionChoice, FilingStatus, TaxYearTables};

/// Deduction amount and which kind was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    pub amount: Decimal,
    pub itemized: bool,
}

/// Result of spreading the deduction across both income streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionAllocation {
    pub ratio: Decimal,
    pub taxable_ordinary: Decimal,
    pub taxable_qualified: Decimal,
}

/// Resolves the deduction amount for a choice and filing status.
///
/// An itemized amount that cannot be read counts as zero.
pub fn resolve(
    choice: &DeductionChoice,
    status: FilingStatus,
    tables: &TaxYearTables,
) -> Deduction {
    match choice {
        DeductionChoice::Standard => Deduction {
            amount: tables.standard_deduction(status),
            itemized: false,
        },
        DeductionChoice::Itemized(raw) => Deduction {
            amount: coerce_amount(raw),
            itemized: true,
        },
    }
}

/// Applies `deduction` to both streams by the same ratio.
pub fn allocate(
    totals: &IncomeTotals,
    deduction: Decimal,
) -> DeductionAllocation {
    let total = totals.total();
    if total <= Decimal::ZERO {
        return DeductionAllocation {
            ratio: Decimal::ZERO,
            taxable_ordinary: non_negative(totals.ordinary),
            taxable_qualified: non_negative(totals.qualified),
        };
    }

    let Some(ratio) = deduction.checked_div(total) else {
        warn!(%deduction, %total, "deduction ratio overflowed, treating income as fully deducted");
        return DeductionAllocation {
            ratio: Decimal::MAX,
            taxable_ordinary: Decimal::ZERO,
            taxable_qualified: Decimal::ZERO,
        };
    };

    let allocation = DeductionAllocation {
        ratio,
        taxable_ordinary: shrink(totals.ordinary, ratio),
        taxable_qualified: shrink(totals.qualified, ratio),
    };
    debug!(
        %ratio,
        taxable_ordinary = %allocation.taxable_ordinary,
        taxable_qualified = %allocation.taxable_qualified,
        "allocated deduction"
    );
    allocation
}

fn shrink(
    income: Decimal,
    ratio: Decimal,
) -> Decimal {
    Decimal::ONE
        .checked_sub(ratio)
        .and_then(|factor| income.checked_mul(factor))
        .map(non_negative)
        .unwrap_or(Decimal::ZERO)
}
