//! CSV loaders for tax year rate schedules and standard deductions.

pub mod loader;

pub use loader::{StandardDeductionRecord, TaxBracketRecord, TaxTableLoader, TaxTableLoaderError};
