use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    ListedEquity,
    EquityFund,
    RealEstate,
    Bond,
    Gold,
    Other,
}

impl AssetClass {
    /// Equity-oriented classes get the concessional gains rates and the
    /// long-term exemption.
    pub fn is_equity(&self) -> bool {
        matches!(self, Self::ListedEquity | Self::EquityFund)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListedEquity => "listed-equity",
            Self::EquityFund => "equity-fund",
            Self::RealEstate => "real-estate",
            Self::Bond => "bond",
            Self::Gold => "gold",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "listed-equity" => Some(Self::ListedEquity),
            "equity-fund" => Some(Self::EquityFund),
            "real-estate" => Some(Self::RealEstate),
            "bond" => Some(Self::Bond),
            "gold" => Some(Self::Gold),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single asset disposal to be classified and taxed.
///
/// For real estate, `acquisition_price` is assumed to already carry any
/// indexation adjustment applied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalEvent {
    pub asset_class: AssetClass,
    pub acquisition_price: Decimal,
    pub disposal_price: Decimal,
    pub acquisition_date: NaiveDate,
    pub disposal_date: NaiveDate,
}
