use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{FiscalYear, TaxRegime};

/// One slab of a progressive bracket table.
///
/// Tables are ordered ascending by `lower_bound` and partition `[0, inf)`
/// without gaps or overlaps; the last bracket has `upper_bound: None`
/// (open-ended). `rate` is a percentage, e.g. `20` for 20%.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub fiscal_year: FiscalYear,
    pub regime: TaxRegime,
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}
