use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::{FilingStatus, Schedule, TaxYearTables};
use tax_data::TaxTableLoader;

/// Validate tax table CSV files and print the tables they describe.
///
/// The brackets file should have the following columns:
/// - tax_year: The tax year (e.g., 2025)
/// - schedule: `ordinary` or `qualified`
/// - filing_status: `single`, `joint` or `head` (or S, MFJ, HOH)
/// - rate: The marginal tax rate as a decimal (e.g., 0.10)
/// - up_to: The bracket ceiling (empty for the top bracket)
///
/// The deductions file has `tax_year`, `filing_status` and `amount`.
#[derive(Parser, Debug)]
#[command(name = "tax-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing bracket data
    #[arg(short, long)]
    brackets: PathBuf,

    /// Path to the CSV file containing standard deductions
    #[arg(short, long)]
    deductions: PathBuf,

    /// Only validate, do not print the tables
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

fn print_tables(tables: &TaxYearTables) {
    println!("Tax year {}", tables.tax_year());
    for status in FilingStatus::ALL {
        println!(
            "  {} (standard deduction {})",
            status.label(),
            tables.standard_deduction(status)
        );
        for (schedule, brackets) in [
            (Schedule::Ordinary, tables.ordinary_brackets(status)),
            (Schedule::Qualified, tables.qualified_brackets(status)),
        ] {
            println!("    {schedule}:");
            for bracket in brackets {
                match bracket.up_to {
                    Some(ceiling) => println!("      {:>6} up to {}", bracket.rate, ceiling),
                    None => println!("      {:>6} above", bracket.rate),
                }
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Loading brackets from: {}", args.brackets.display());
    println!("Loading deductions from: {}", args.deductions.display());

    let tables = TaxTableLoader::from_files(&args.brackets, &args.deductions).with_context(|| {
        format!(
            "Failed to load tax tables from {} and {}",
            args.brackets.display(),
            args.deductions.display()
        )
    })?;

    if !args.quiet {
        for year in &tables {
            print_tables(year);
        }
    }

    println!("Successfully validated {} tax year(s).", tables.len());

    Ok(())
}
