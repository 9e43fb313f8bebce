use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::IncomeAmounts;

/// Income split into the two streams the brackets tax differently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTotals {
    /// Wages, interest, non-qualified dividends, short-term gains and other income.
    pub ordinary: Decimal,
    /// Qualified dividends and long-term gains.
    pub qualified: Decimal,
}

impl IncomeTotals {
    pub fn total(&self) -> Decimal {
        self.ordinary + self.qualified
    }
}

/// Sums coerced income fields into ordinary and qualified streams.
pub fn aggregate(amounts: &IncomeAmounts) -> IncomeTotals {
    let ordinary = [
        amounts.wages,
        amounts.interest,
        amounts.non_qualified_dividends,
        amounts.short_term_gains,
        amounts.other_income,
    ]
    .into_iter()
    .sum();

    IncomeTotals {
        ordinary,
        qualified: amounts.qualified_dividends + amounts.long_term_gains,
    }
}
