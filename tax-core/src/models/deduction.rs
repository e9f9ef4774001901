use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::FiscalYear;

/// Statutory deduction sections recognized by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeductionSection {
    /// Principal tax-saving investments (PPF, ELSS, life insurance, ...).
    Section80C,
    /// Additional pension-scheme contribution.
    Section80Ccd1B,
    /// Health-insurance premium.
    Section80D,
    /// Home-loan interest on self-occupied property.
    Section24B,
    /// Savings-account interest.
    Section80Tta,
    /// Charitable donations. Eligibility limits depend on the donee and
    /// are assumed applied by the caller, so no cap here.
    Section80G,
    Other,
}

impl DeductionSection {
    pub const ALL: [Self; 7] = [
        Self::Section80C,
        Self::Section80Ccd1B,
        Self::Section80D,
        Self::Section24B,
        Self::Section80Tta,
        Self::Section80G,
        Self::Other,
    ];

    /// Statutory ceiling on the deductible amount, or `None` for
    /// pass-through sections.
    pub fn statutory_cap(&self) -> Option<Decimal> {
        match self {
            Self::Section80C => Some(dec!(150000)),
            Self::Section80Ccd1B => Some(dec!(50000)),
            Self::Section80D => Some(dec!(25000)),
            Self::Section24B => Some(dec!(200000)),
            Self::Section80Tta => Some(dec!(10000)),
            Self::Section80G | Self::Other => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Section80C => "80C",
            Self::Section80Ccd1B => "80CCD1B",
            Self::Section80D => "80D",
            Self::Section24B => "24B",
            Self::Section80Tta => "80TTA",
            Self::Section80G => "80G",
            Self::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "80C" => Some(Self::Section80C),
            "80CCD1B" => Some(Self::Section80Ccd1B),
            "80D" => Some(Self::Section80D),
            "24B" => Some(Self::Section24B),
            "80TTA" => Some(Self::Section80Tta),
            "80G" => Some(Self::Section80G),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeductionSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single deduction claimed by the filer for one fiscal year. The engine
/// only reads snapshots of these; creation and storage live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionEntry {
    pub section: DeductionSection,
    pub amount: Decimal,
    pub fiscal_year: FiscalYear,
}
