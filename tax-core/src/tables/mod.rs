//! Compiled-in reference tables and a registry keyed by tax year.
//!
//! Adding a year means adding its tables, either as a module here or as data
//! loaded at runtime and inserted into a [`TaxTableRegistry`]; the
//! calculation code never changes.

mod y2024;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::TaxYearTables;

static TAX_YEAR_2024: OnceLock<TaxYearTables> = OnceLock::new();

/// Tax year 2024 tables.
pub fn tax_year_2024() -> &'static TaxYearTables {
    TAX_YEAR_2024.get_or_init(y2024::tables)
}

/// Tables for every known tax year.
///
/// Typical lifetime:
/// 1. Start from [`TaxTableRegistry::builtin`].
/// 2. Call `insert` for each year loaded from data files.
/// 3. Call `get` (or `latest`) whenever a calculation needs tables.
#[derive(Debug, Clone, Default)]
pub struct TaxTableRegistry {
    years: BTreeMap<i32, TaxYearTables>,
}

impl TaxTableRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing every compiled-in year.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(tax_year_2024().clone());
        registry
    }

    /// Register tables for their year.
    ///
    /// If tables for the same year are already present they are replaced,
    /// and the previous tables are returned.
    pub fn insert(
        &mut self,
        tables: TaxYearTables,
    ) -> Option<TaxYearTables> {
        let year = tables.tax_year();
        let previous = self.years.insert(year, tables);
        if previous.is_some() {
            debug!(year, "replaced tax tables");
        }
        previous
    }

    pub fn get(
        &self,
        year: i32,
    ) -> Option<&TaxYearTables> {
        self.years.get(&year)
    }

    /// Tables for the most recent year, if any are registered.
    pub fn latest(&self) -> Option<&TaxYearTables> {
        self.years.values().next_back()
    }

    /// Registered years in ascending order.
    pub fn years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{FilingStatus, StandardDeductions, TaxBracket, TaxBrackets};

    fn flat_tables(year: i32) -> TaxYearTables {
        let flat = TaxBrackets {
            single: vec![TaxBracket::unbounded(dec!(0.10))],
            joint: vec![TaxBracket::unbounded(dec!(0.10))],
            head: vec![TaxBracket::unbounded(dec!(0.10))],
        };
        let deductions = StandardDeductions {
            single: dec!(0),
            joint: dec!(0),
            head: dec!(0),
        };
        TaxYearTables::new(year, flat.clone(), flat, deductions).unwrap()
    }

    #[test]
    fn builtin_2024_tables_are_valid() {
        assert_eq!(tax_year_2024().validate(), Ok(()));
    }

    #[test]
    fn builtin_2024_has_seven_ordinary_and_three_qualified_brackets() {
        let tables = tax_year_2024();

        for status in FilingStatus::ALL {
            assert_eq!(tables.ordinary_brackets(status).len(), 7);
            assert_eq!(tables.qualified_brackets(status).len(), 3);
        }
    }

    #[test]
    fn builtin_2024_joint_values() {
        let tables = tax_year_2024();

        assert_eq!(tables.ordinary_brackets(FilingStatus::Joint)[0].up_to, Some(dec!(23200)));
        assert_eq!(tables.qualified_brackets(FilingStatus::Joint)[1].up_to, Some(dec!(583750)));
        assert_eq!(tables.standard_deduction(FilingStatus::Joint), dec!(29200));
    }

    #[test]
    fn builtin_registry_contains_2024() {
        let registry = TaxTableRegistry::builtin();

        assert_eq!(registry.years(), vec![2024]);
        assert_eq!(registry.get(2024), Some(tax_year_2024()));
        assert_eq!(registry.get(2023), None);
    }

    #[test]
    fn latest_returns_highest_year() {
        let mut registry = TaxTableRegistry::builtin();
        registry.insert(flat_tables(2030));
        registry.insert(flat_tables(2020));

        assert_eq!(registry.latest().map(TaxYearTables::tax_year), Some(2030));
        assert_eq!(registry.years(), vec![2020, 2024, 2030]);
    }

    #[test]
    fn insert_replaces_existing_year() {
        let mut registry = TaxTableRegistry::builtin();

        let previous = registry.insert(flat_tables(2024));

        assert_eq!(previous.as_ref(), Some(tax_year_2024()));
        assert_eq!(registry.get(2024), Some(&flat_tables(2024)));
    }

    #[test]
    fn empty_registry_has_no_latest() {
        assert_eq!(TaxTableRegistry::new().latest(), None);
    }
}
