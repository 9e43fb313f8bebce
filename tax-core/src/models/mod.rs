mod filing_status;
mod income_inputs;
mod standard_deduction;
mod tax_bracket;
mod tax_results;
mod tax_year_tables;

pub use filing_status::{FilingStatus, ParseFilingStatusError};
pub use income_inputs::{DeductionChoice, IncomeAmounts, IncomeInputs};
pub use standard_deduction::StandardDeductions;
pub use tax_bracket::{TaxBracket, TaxBrackets};
pub use tax_results::{BracketSlice, TaxResults, TaxSummary};
pub use tax_year_tables::{Schedule, TaxTableError, TaxYearTables};
