//! Integration tests for tax table loading using the bundled data files.

use std::path::Path;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::{
    DeductionChoice, FilingStatus, IncomeInputs, TaxBracket, TaxCalculator, TaxTableRegistry,
    tax_year_2024,
};
use tax_data::{TaxTableLoader, TaxTableLoaderError};

const BRACKETS_2024: &str = include_str!("../test-data/brackets_2024.csv");
const DEDUCTIONS_2024: &str = include_str!("../test-data/deductions_2024.csv");
const BRACKETS_2025: &str = include_str!("../test-data/brackets_2025.csv");
const DEDUCTIONS_2025: &str = include_str!("../test-data/deductions_2025.csv");

fn test_data(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data").join(name)
}

#[test]
fn test_2024_files_match_builtin_tables() {
    let brackets = TaxTableLoader::parse_brackets(BRACKETS_2024.as_bytes()).unwrap();
    let deductions = TaxTableLoader::parse_deductions(DEDUCTIONS_2024.as_bytes()).unwrap();

    let tables = TaxTableLoader::build(2024, &brackets, &deductions).unwrap();

    assert_eq!(&tables, tax_year_2024());
}

#[test]
fn test_2024_file_has_every_bracket() {
    let brackets = TaxTableLoader::parse_brackets(BRACKETS_2024.as_bytes()).unwrap();

    // 7 ordinary + 3 qualified brackets for each of the 3 filing statuses
    assert_eq!(brackets.len(), 30);
}

#[test]
fn test_load_2025_with_short_status_codes() {
    let brackets = TaxTableLoader::parse_brackets(BRACKETS_2025.as_bytes()).unwrap();
    let deductions = TaxTableLoader::parse_deductions(DEDUCTIONS_2025.as_bytes()).unwrap();

    let tables = TaxTableLoader::build(2025, &brackets, &deductions).unwrap();

    assert_eq!(tables.tax_year(), 2025);
    assert_eq!(tables.standard_deduction(FilingStatus::Joint), dec!(30000));
    assert_eq!(
        tables.ordinary_brackets(FilingStatus::Single)[0],
        TaxBracket::new(dec!(0.10), dec!(11925))
    );
    assert_eq!(
        tables.qualified_brackets(FilingStatus::Head)[0],
        TaxBracket::new(dec!(0.00), dec!(64750))
    );
}

#[test]
fn test_load_registry_adds_both_years() {
    let mut registry = TaxTableRegistry::new();

    let years = TaxTableLoader::load_registry(
        &mut registry,
        &test_data("brackets_2025.csv"),
        &test_data("deductions_2025.csv"),
    )
    .unwrap();
    assert_eq!(years, vec![2025]);

    TaxTableLoader::load_registry(
        &mut registry,
        &test_data("brackets_2024.csv"),
        &test_data("deductions_2024.csv"),
    )
    .unwrap();

    assert_eq!(registry.years(), vec![2024, 2025]);
    assert_eq!(registry.latest().map(|t| t.tax_year()), Some(2025));
}

#[test]
fn test_mismatched_files_report_missing_deduction() {
    let err = TaxTableLoader::from_files(
        &test_data("brackets_2025.csv"),
        &test_data("deductions_2024.csv"),
    )
    .unwrap_err();

    assert!(
        matches!(err, TaxTableLoaderError::MissingDeduction { tax_year: 2025, .. }),
        "got: {err:?}"
    );
}

#[test]
fn test_calculate_with_loaded_tables() {
    let tables = TaxTableLoader::from_files(
        &test_data("brackets_2024.csv"),
        &test_data("deductions_2024.csv"),
    )
    .unwrap()
    .pop()
    .unwrap();
    let inputs = IncomeInputs {
        wages: "60000".into(),
        ..Default::default()
    };

    let summary = TaxCalculator::new(&tables).calculate(
        &inputs,
        FilingStatus::Single,
        &DeductionChoice::Standard,
    );

    assert_eq!(summary.results.total_tax.round_dp(2), dec!(5216.00));
    assert_eq!(summary.deduction, dec!(14600));
}
