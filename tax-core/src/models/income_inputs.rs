use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::coerce_amount;

/// Raw, free-text income fields as entered by the user.
///
/// Every field is coerced independently by [`coerce_amount`]; a field that is
/// empty or not a number counts as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeInputs {
    pub wages: String,
    pub interest: String,
    pub non_qualified_dividends: String,
    pub qualified_dividends: String,
    pub short_term_gains: String,
    pub long_term_gains: String,
    pub other_income: String,
}

impl IncomeInputs {
    /// Coerces every field into an amount.
    pub fn amounts(&self) -> IncomeAmounts {
        IncomeAmounts {
            wages: coerce_amount(&self.wages),
            interest: coerce_amount(&self.interest),
            non_qualified_dividends: coerce_amount(&self.non_qualified_dividends),
            qualified_dividends: coerce_amount(&self.qualified_dividends),
            short_term_gains: coerce_amount(&self.short_term_gains),
            long_term_gains: coerce_amount(&self.long_term_gains),
            other_income: coerce_amount(&self.other_income),
        }
    }
}

/// Income fields after coercion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeAmounts {
    pub wages: Decimal,
    pub interest: Decimal,
    pub non_qualified_dividends: Decimal,
    pub qualified_dividends: Decimal,
    pub short_term_gains: Decimal,
    pub long_term_gains: Decimal,
    pub other_income: Decimal,
}

/// How the deduction is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "lowercase")]
pub enum DeductionChoice {
    /// The standard deduction for the filing status.
    #[default]
    Standard,
    /// A user-supplied itemized amount, coerced like any income field.
    Itemized(String),
}

impl DeductionChoice {
    pub fn itemized(amount: impl Into<String>) -> Self {
        Self::Itemized(amount.into())
    }

    pub fn is_itemized(&self) -> bool {
        matches!(self, Self::Itemized(_))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn amounts_coerce_each_field_independently() {
        let inputs = IncomeInputs {
            wages: "60000".to_string(),
            interest: "abc".to_string(),
            non_qualified_dividends: String::new(),
            qualified_dividends: "1,250.50".to_string(),
            short_term_gains: "-300".to_string(),
            long_term_gains: " 4000 ".to_string(),
            other_income: "12.5xyz".to_string(),
        };

        let amounts = inputs.amounts();

        assert_eq!(
            amounts,
            IncomeAmounts {
                wages: dec!(60000),
                interest: Decimal::ZERO,
                non_qualified_dividends: Decimal::ZERO,
                qualified_dividends: dec!(1250.50),
                short_term_gains: dec!(-300),
                long_term_gains: dec!(4000),
                other_income: dec!(12.5),
            }
        );
    }

    #[test]
    fn default_inputs_are_all_zero() {
        assert_eq!(IncomeInputs::default().amounts(), IncomeAmounts::default());
    }

    #[test]
    fn deduction_choice_reports_itemized() {
        assert!(DeductionChoice::itemized("20000").is_itemized());
        assert!(!DeductionChoice::Standard.is_itemized());
    }

    #[test]
    fn deduction_choice_serializes_with_kind_tag() {
        let json = serde_json::to_string(&DeductionChoice::itemized("5000")).unwrap();

        assert_eq!(json, r#"{"kind":"itemized","amount":"5000"}"#);
    }
}
