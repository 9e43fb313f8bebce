//! Optional TOML configuration file.
//!
//! Every key is optional. Command-line flags take precedence over the file,
//! and the file takes precedence over the built-in defaults.
//!
//! ```toml
//! tax_year = 2024
//! filing_status = "joint"
//! brackets_file = "data/brackets.csv"
//! deductions_file = "data/deductions.csv"
//! log_level = "debug"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tax_core::{FilingStatus, TaxTableRegistry, TaxYearTables};
use tax_data::{TaxTableLoader, TaxTableLoaderError};
use thiserror::Error;
use tracing::info;

/// Tax year used when neither the command line nor the config names one.
pub const DEFAULT_TAX_YEAR: i32 = 2024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("'{0}' must be set together with '{1}'")]
    IncompleteTables(&'static str, &'static str),

    #[error(transparent)]
    Tables(#[from] TaxTableLoaderError),

    #[error(
        "no tax tables for {year} (available: {available:?}); pass --brackets and --deductions to load them"
    )]
    UnknownYear { year: i32, available: Vec<i32> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tax_year: Option<i32>,
    pub filing_status: Option<FilingStatus>,
    pub brackets_file: Option<PathBuf>,
    pub deductions_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn parse(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Reads and parses a config file. Relative table paths are resolved
    /// against the directory containing the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.brackets_file = config.brackets_file.map(|p| base.join(p));
            config.deductions_file = config.deductions_file.map(|p| base.join(p));
        }
        Ok(config)
    }

    /// Loads `path` when given and overlays `overrides` on it.
    pub fn resolve(
        path: Option<&Path>,
        overrides: Config,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(file.merge(overrides))
    }

    /// Built-in tables plus every year in the configured table files.
    pub fn build_registry(&self) -> Result<TaxTableRegistry, ConfigError> {
        let mut registry = TaxTableRegistry::builtin();
        if let Some((brackets, deductions)) = self.table_files()? {
            let years = TaxTableLoader::load_registry(&mut registry, brackets, deductions)?;
            info!(?years, "loaded tax tables");
        }
        Ok(registry)
    }

    /// Tables for the configured year.
    pub fn year_tables<'r>(
        &self,
        registry: &'r TaxTableRegistry,
    ) -> Result<&'r TaxYearTables, ConfigError> {
        let year = self.tax_year();
        registry.get(year).ok_or_else(|| ConfigError::UnknownYear {
            year,
            available: registry.years(),
        })
    }

    /// Table files, if both are configured.
    pub fn table_files(&self) -> Result<Option<(&Path, &Path)>, ConfigError> {
        match (&self.brackets_file, &self.deductions_file) {
            (Some(brackets), Some(deductions)) => Ok(Some((brackets, deductions))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::IncompleteTables("brackets_file", "deductions_file")),
            (None, Some(_)) => Err(ConfigError::IncompleteTables("deductions_file", "brackets_file")),
        }
    }

    /// Overlays values set on the command line.
    pub fn merge(
        mut self,
        overrides: Config,
    ) -> Self {
        if overrides.tax_year.is_some() {
            self.tax_year = overrides.tax_year;
        }
        if overrides.filing_status.is_some() {
            self.filing_status = overrides.filing_status;
        }
        if overrides.brackets_file.is_some() {
            self.brackets_file = overrides.brackets_file;
        }
        if overrides.deductions_file.is_some() {
            self.deductions_file = overrides.deductions_file;
        }
        if overrides.log_level.is_some() {
            self.log_level = overrides.log_level;
        }
        self
    }

    pub fn tax_year(&self) -> i32 {
        self.tax_year.unwrap_or(DEFAULT_TAX_YEAR)
    }

    pub fn filing_status(&self) -> FilingStatus {
        self.filing_status.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.tax_year(), 2024);
        assert_eq!(config.filing_status(), FilingStatus::Single);
    }

    #[test]
    fn parses_every_key() {
        let config = Config::parse(
            r#"
tax_year = 2025
filing_status = "head"
brackets_file = "b.csv"
deductions_file = "d.csv"
log_level = "debug"
"#,
        )
        .unwrap();

        assert_eq!(
            config,
            Config {
                tax_year: Some(2025),
                filing_status: Some(FilingStatus::Head),
                brackets_file: Some(PathBuf::from("b.csv")),
                deductions_file: Some(PathBuf::from("d.csv")),
                log_level: Some("debug".to_string()),
            }
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::parse("year = 2024").is_err());
    }

    #[test]
    fn rejects_unknown_filing_status() {
        assert!(Config::parse(r#"filing_status = "widow""#).is_err());
    }

    #[test]
    fn command_line_overrides_file() {
        let file = Config {
            tax_year: Some(2025),
            filing_status: Some(FilingStatus::Joint),
            log_level: Some("warn".to_string()),
            ..Default::default()
        };
        let flags = Config {
            filing_status: Some(FilingStatus::Head),
            ..Default::default()
        };

        let merged = file.merge(flags);

        assert_eq!(merged.tax_year(), 2025);
        assert_eq!(merged.filing_status(), FilingStatus::Head);
        assert_eq!(merged.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn table_files_must_come_in_pairs() {
        let config = Config {
            brackets_file: Some(PathBuf::from("b.csv")),
            ..Default::default()
        };

        assert!(matches!(
            config.table_files(),
            Err(ConfigError::IncompleteTables("brackets_file", "deductions_file"))
        ));
        assert!(matches!(Config::default().table_files(), Ok(None)));
    }

    fn tax_data_file(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("tax-data")
            .join("test-data")
            .join(name)
    }

    fn write_config(
        name: &str,
        contents: &str,
    ) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("taxcalc-config-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("taxcalc.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn resolve_without_file_uses_flags_then_defaults() {
        let flags = Config {
            tax_year: Some(2025),
            ..Default::default()
        };

        let config = Config::resolve(None, flags).unwrap();

        assert_eq!(config.tax_year(), 2025);
        assert_eq!(config.filing_status(), FilingStatus::Single);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn resolve_applies_flags_over_file_over_defaults() {
        let path = write_config(
            "precedence",
            "tax_year = 2030\nfiling_status = \"joint\"\nlog_level = \"warn\"\n",
        );
        let flags = Config {
            tax_year: Some(2024),
            ..Default::default()
        };

        let config = Config::resolve(Some(&path), flags).unwrap();

        assert_eq!(config.tax_year(), 2024);
        assert_eq!(config.filing_status(), FilingStatus::Joint);
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn load_resolves_table_paths_next_to_file() {
        let path = write_config(
            "relative",
            "brackets_file = \"b.csv\"\ndeductions_file = \"d.csv\"\n",
        );

        let config = Config::load(&path).unwrap();

        let dir = path.parent().unwrap();
        assert_eq!(config.brackets_file, Some(dir.join("b.csv")));
        assert_eq!(config.deductions_file, Some(dir.join("d.csv")));
    }

    #[test]
    fn resolve_reports_invalid_file() {
        let path = write_config("invalid", "tax_year = \"soon\"\n");

        let err = Config::resolve(Some(&path), Config::default()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }), "got: {err:?}");
    }

    #[test]
    fn builtin_registry_serves_default_year() {
        let config = Config::default();

        let registry = config.build_registry().unwrap();
        let tables = config.year_tables(&registry).unwrap();

        assert_eq!(tables.tax_year(), 2024);
    }

    #[test]
    fn table_files_add_years_to_registry() {
        let config = Config {
            tax_year: Some(2025),
            brackets_file: Some(tax_data_file("brackets_2025.csv")),
            deductions_file: Some(tax_data_file("deductions_2025.csv")),
            ..Default::default()
        };

        let registry = config.build_registry().unwrap();

        assert_eq!(registry.years(), vec![2024, 2025]);
        assert_eq!(config.year_tables(&registry).unwrap().tax_year(), 2025);
    }

    #[test]
    fn unknown_year_lists_available_years() {
        let config = Config {
            tax_year: Some(2019),
            ..Default::default()
        };
        let registry = config.build_registry().unwrap();

        let err = config.year_tables(&registry).unwrap_err();

        match err {
            ConfigError::UnknownYear { year, available } => {
                assert_eq!(year, 2019);
                assert_eq!(available, vec![2024]);
            }
            other => panic!("expected UnknownYear, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_table_files_are_reported() {
        let config = Config {
            brackets_file: Some(PathBuf::from("/nonexistent/b.csv")),
            deductions_file: Some(PathBuf::from("/nonexistent/d.csv")),
            ..Default::default()
        };

        let err = config.build_registry().unwrap_err();

        assert!(matches!(err, ConfigError::Tables(_)), "got: {err:?}");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/nonexistent/taxcalc.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }), "got: {err:?}");
    }
}
