pub mod calculations;
pub mod models;
pub mod tables;

pub use calculations::{TaxCalculator, compute_tax};
pub use models::*;
pub use tables::{TaxTableRegistry, tax_year_2024};
