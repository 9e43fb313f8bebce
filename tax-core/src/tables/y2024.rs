//! Tax year 2024 rate schedules and standard deductions.

use rust_decimal_macros::dec;

use crate::{StandardDeductions, TaxBracket, TaxBrackets, TaxYearTables};

pub(super) fn tables() -> TaxYearTables {
    TaxYearTables::from_static(2024, ordinary(), qualified(), standard_deductions())
}

fn ordinary() -> TaxBrackets {
    TaxBrackets {
        single: vec![
            TaxBracket::new(dec!(0.10), dec!(11600)),
            TaxBracket::new(dec!(0.12), dec!(47150)),
            TaxBracket::new(dec!(0.22), dec!(100525)),
            TaxBracket::new(dec!(0.24), dec!(191950)),
            TaxBracket::new(dec!(0.32), dec!(243725)),
            TaxBracket::new(dec!(0.35), dec!(609350)),
            TaxBracket::unbounded(dec!(0.37)),
        ],
        joint: vec![
            TaxBracket::new(dec!(0.10), dec!(23200)),
            TaxBracket::new(dec!(0.12), dec!(94300)),
            TaxBracket::new(dec!(0.22), dec!(201050)),
            TaxBracket::new(dec!(0.24), dec!(383900)),
            TaxBracket::new(dec!(0.32), dec!(487450)),
            TaxBracket::new(dec!(0.35), dec!(731200)),
            TaxBracket::unbounded(dec!(0.37)),
        ],
        head: vec![
            TaxBracket::new(dec!(0.10), dec!(16550)),
            TaxBracket::new(dec!(0.12), dec!(63100)),
            TaxBracket::new(dec!(0.22), dec!(100500)),
            TaxBracket::new(dec!(0.24), dec!(191950)),
            TaxBracket::new(dec!(0.32), dec!(243700)),
            TaxBracket::new(dec!(0.35), dec!(609350)),
            TaxBracket::unbounded(dec!(0.37)),
        ],
    }
}

/// Long-term capital gains and qualified dividend rates.
fn qualified() -> TaxBrackets {
    TaxBrackets {
        single: vec![
            TaxBracket::new(dec!(0.00), dec!(47025)),
            TaxBracket::new(dec!(0.15), dec!(518900)),
            TaxBracket::unbounded(dec!(0.20)),
        ],
        joint: vec![
            TaxBracket::new(dec!(0.00), dec!(94050)),
            TaxBracket::new(dec!(0.15), dec!(583750)),
            TaxBracket::unbounded(dec!(0.20)),
        ],
        head: vec![
            TaxBracket::new(dec!(0.00), dec!(63000)),
            TaxBracket::new(dec!(0.15), dec!(551350)),
            TaxBracket::unbounded(dec!(0.20)),
        ],
    }
}

fn standard_deductions() -> StandardDeductions {
    StandardDeductions {
        single: dec!(14600),
        joint: dec!(29200),
        head: dec!(21900),
    }
}
