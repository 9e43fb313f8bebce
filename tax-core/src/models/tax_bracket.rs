use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// One marginal bracket.
///
/// `up_to` is the cumulative income ceiling of the bracket; its floor is the
/// previous bracket's ceiling (or zero for the first bracket). `None` marks
/// the unbounded top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub rate: Decimal,
    pub up_to: Option<Decimal>,
}

impl TaxBracket {
    pub fn new(
        rate: Decimal,
        up_to: Decimal,
    ) -> Self {
        Self {
            rate,
            up_to: Some(up_to),
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self { rate, up_to: None }
    }

    /// Width of the bracket given the previous ceiling, `None` when unbounded.
    pub fn width(
        &self,
        floor: Decimal,
    ) -> Option<Decimal> {
        self.up_to.map(|ceiling| ceiling - floor)
    }
}

/// A bracket schedule for every filing status, ordered by ascending ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBrackets {
    pub single: Vec<TaxBracket>,
    pub joint: Vec<TaxBracket>,
    pub head: Vec<TaxBracket>,
}

impl TaxBrackets {
    pub fn for_status(
        &self,
        status: FilingStatus,
    ) -> &[TaxBracket] {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::Joint => &self.joint,
            FilingStatus::Head => &self.head,
        }
    }
}
