mod asset;
mod deduction;
mod fiscal_year;
mod regime;
mod tax_bracket;

pub use asset::{AssetClass, DisposalEvent};
pub use deduction::{DeductionEntry, DeductionSection};
pub use fiscal_year::FiscalYear;
pub use regime::{RegimeSchedule, TaxRegime};
pub use tax_bracket::TaxBracket;
