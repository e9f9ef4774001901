use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{FiscalYear, TaxBracket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxRegime {
    /// Full-deduction regime: standard deduction plus all eligible
    /// section-wise deductions, taxed on the old slab table.
    Old,
    /// Simplified regime: standard deduction only, lower marginal rates.
    New,
}

impl TaxRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "old" => Some(Self::Old),
            "new" => Some(Self::New),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The statutory table set for one regime in one fiscal year: the standard
/// deduction and the ordered slab table. Supplied as static, versioned
/// configuration; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeSchedule {
    pub fiscal_year: FiscalYear,
    pub regime: TaxRegime,
    pub standard_deduction: Decimal,
    pub brackets: Vec<TaxBracket>,
}
