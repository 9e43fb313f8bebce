//! Federal income tax calculation pipeline.
//!
//! Income aggregation, deduction allocation, the ordinary and stacked
//! preferential bracket engines, and the summary derived from them. Every
//! step is a pure function of its inputs and the year's tables.

pub mod brackets;
pub mod calculator;
pub mod common;
pub mod deduction;
pub mod income;

pub use brackets::{BracketTax, ordinary_tax, stacked_tax};
pub use calculator::{TaxCalculator, compute_tax};
pub use deduction::{Deduction, DeductionAllocation};
pub use income::IncomeTotals;
