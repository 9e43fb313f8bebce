use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use tax_cli::config::Config;
use tax_cli::{commands, csv_loader, logging};
use tax_core::{DeductionChoice, FilingStatus, IncomeInputs, TaxCalculator};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Federal income tax calculator.
///
/// Splits income into ordinary and preferential (qualified dividends and
/// long-term gains) streams, applies the standard or an itemized deduction,
/// and taxes each stream against the year's bracket tables.
#[derive(Debug, Parser)]
#[command(name = "taxcalc", version, about)]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tax year to use. Defaults to 2024.
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Bracket CSV to load in addition to the built-in tables.
    #[arg(long, global = true)]
    brackets: Option<PathBuf>,

    /// Standard deduction CSV matching `--brackets`.
    #[arg(long, global = true)]
    deductions: Option<PathBuf>,

    /// Log level or EnvFilter directive. `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate tax for one set of income figures.
    Compute(ComputeArgs),

    /// Calculate tax for every scenario in a CSV file.
    Batch {
        /// Scenario CSV file.
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print the bracket tables and standard deductions.
    Tables {
        /// Only show this filing status.
        #[arg(short, long)]
        status: Option<FilingStatus>,
    },
}

/// Amounts are free text: `$` and `,` are ignored, anything unreadable
/// counts as zero.
#[derive(Debug, Args)]
struct ComputeArgs {
    /// Filing status: single, joint or head.
    #[arg(short, long)]
    status: Option<FilingStatus>,

    #[arg(long, default_value = "", allow_hyphen_values = true)]
    wages: String,

    #[arg(long, default_value = "", allow_hyphen_values = true)]
    interest: String,

    #[arg(long, default_value = "", allow_hyphen_values = true)]
    non_qualified_dividends: String,

    #[arg(long, default_value = "", allow_hyphen_values = true)]
    qualified_dividends: String,

    #[arg(long, default_value = "", allow_hyphen_values = true)]
    short_term_gains: String,

    #[arg(long, default_value = "", allow_hyphen_values = true)]
    long_term_gains: String,

    #[arg(long, default_value = "", allow_hyphen_values = true)]
    other_income: String,

    /// Itemized deduction. The standard deduction is used when omitted.
    #[arg(long, allow_hyphen_values = true)]
    itemized: Option<String>,

    /// Show the per-bracket breakdown.
    #[arg(short, long, default_value_t = false)]
    detailed: bool,
}

impl ComputeArgs {
    fn inputs(&self) -> IncomeInputs {
        IncomeInputs {
            wages: self.wages.clone(),
            interest: self.interest.clone(),
            non_qualified_dividends: self.non_qualified_dividends.clone(),
            qualified_dividends: self.qualified_dividends.clone(),
            short_term_gains: self.short_term_gains.clone(),
            long_term_gains: self.long_term_gains.clone(),
            other_income: self.other_income.clone(),
        }
    }

    fn deduction(&self) -> DeductionChoice {
        match &self.itemized {
            Some(amount) => DeductionChoice::itemized(amount.clone()),
            None => DeductionChoice::Standard,
        }
    }
}

// ─── setup ───────────────────────────────────────────────────────────────────

fn resolve_config(cli: &Cli) -> Result<Config> {
    let status = match &cli.command {
        Command::Compute(args) => args.status,
        _ => None,
    };
    let overrides = Config {
        tax_year: cli.year,
        filing_status: status,
        brackets_file: cli.brackets.clone(),
        deductions_file: cli.deductions.clone(),
        log_level: cli.log_level.clone(),
    };
    Ok(Config::resolve(cli.config.as_deref(), overrides)?)
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    logging::init(config.log_level.as_deref(), cli.log_file.as_deref())?;
    debug!(?config, "resolved configuration");

    let registry = config
        .build_registry()
        .context("Failed to load tax tables")?;
    let year_tables = config.year_tables(&registry)?;
    let calculator = TaxCalculator::new(year_tables);

    let output = match &cli.command {
        Command::Compute(args) => commands::compute(
            &calculator,
            config.filing_status(),
            &args.inputs(),
            &args.deduction(),
            args.detailed,
            cli.json,
        )?,
        Command::Batch { file } => {
            let scenarios = csv_loader::load_from_file(file)
                .with_context(|| format!("Failed to load scenarios from {}", file.display()))?;
            info!(count = scenarios.len(), "loaded scenarios");
            commands::batch(&calculator, scenarios, cli.json)?
        }
        Command::Tables { status } => commands::tables(year_tables, *status, cli.json)?,
    };
    print!("{output}");

    Ok(())
}
