//! Capital-gains classification and taxation.
//!
//! Classifies an asset disposal as short- or long-term from its holding
//! period and applies the class- and term-specific rate:
//!
//! | Class                      | Long-term from | Long-term            | Short-term |
//! |----------------------------|----------------|----------------------|------------|
//! | listed equity, equity fund | 12 months      | 10% above ₹1,00,000  | 15%        |
//! | real estate                | 24 months      | 20%                  | slab rate* |
//! | bond, gold, other          | 12 months      | 20%                  | slab rate* |
//!
//! \* Short-term non-equity gains are statutorily taxed at the filer's
//! marginal slab rate. The engine applies the flat
//! [`STCG_SLAB_APPROX_RATE`] approximation instead of recomputing the
//! filer's slab position; see that constant.
//!
//! The holding period is whole months computed as elapsed days divided by
//! 30 (a documented 30-day-month approximation). The long-term boundary is
//! inclusive: a disposal at exactly the threshold is long-term.
//!
//! Losses are not modeled specially: a negative gain is reported as-is and
//! `taxable_gain` clamps to zero, so no set-off or carry-forward occurs.
//! For real estate, indexation of the acquisition price is the caller's
//! responsibility.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{clamp_non_negative, pct_of, round_half_up};
use crate::{AssetClass, DisposalEvent};

/// Flat approximation of the filer's marginal slab rate, applied to
/// short-term non-equity gains. The statutory treatment is the filer's
/// actual marginal rate; this engine deliberately approximates it with the
/// top slab rate rather than threading the filer's full income through
/// every disposal.
pub const STCG_SLAB_APPROX_RATE: Decimal = dec!(30);

/// Exemption on long-term equity gains before the concessional rate applies.
pub const EQUITY_LT_EXEMPTION: Decimal = dec!(100000);

/// Errors that can occur during capital-gains classification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CapitalGainsError {
    /// The asset-class code at the input boundary is not recognized.
    #[error("unsupported asset class: {0}")]
    UnsupportedAssetClass(String),

    /// The disposal date precedes the acquisition date.
    #[error("disposal date {disposal} precedes acquisition date {acquisition}")]
    DisposalBeforeAcquisition {
        acquisition: chrono::NaiveDate,
        disposal: chrono::NaiveDate,
    },

    #[error("real-estate long-term threshold must be positive, got {0} months")]
    InvalidRealEstateLtThreshold(i64),

    #[error("default long-term threshold must be positive, got {0} months")]
    InvalidDefaultLtThreshold(i64),

    #[error("equity long-term exemption must be non-negative, got {0}")]
    InvalidEquityLtExemption(Decimal),

    #[error("equity long-term rate must be in [0, 100], got {0}")]
    InvalidEquityLtRate(Decimal),

    #[error("equity short-term rate must be in [0, 100], got {0}")]
    InvalidEquityStRate(Decimal),

    #[error("non-equity long-term rate must be in [0, 100], got {0}")]
    InvalidNonEquityLtRate(Decimal),

    #[error("non-equity short-term rate must be in [0, 100], got {0}")]
    InvalidNonEquityStRate(Decimal),
}

/// Resolves an asset-class code from the input boundary.
///
/// # Errors
///
/// Returns [`CapitalGainsError::UnsupportedAssetClass`] for codes the
/// engine does not recognize; silently defaulting would mis-tax the
/// disposal.
pub fn asset_class_from_code(code: &str) -> Result<AssetClass, CapitalGainsError> {
    AssetClass::parse(code)
        .ok_or_else(|| CapitalGainsError::UnsupportedAssetClass(code.to_string()))
}

/// Statutory parameters for capital-gains taxation.
///
/// [`CapitalGainsConfig::default`] carries the current statutory values;
/// construct explicitly to model a different year's rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainsConfig {
    /// Months of holding from which a real-estate disposal is long-term.
    pub real_estate_lt_threshold_months: i64,
    /// Months of holding from which any other disposal is long-term.
    pub default_lt_threshold_months: i64,
    /// Exemption subtracted from long-term equity gains.
    pub equity_lt_exemption: Decimal,
    /// Rate on long-term equity gains above the exemption.
    pub equity_lt_rate: Decimal,
    /// Rate on short-term equity gains.
    pub equity_st_rate: Decimal,
    /// Rate on long-term non-equity gains.
    pub non_equity_lt_rate: Decimal,
    /// Rate on short-term non-equity gains (see [`STCG_SLAB_APPROX_RATE`]).
    pub non_equity_st_rate: Decimal,
}

impl CapitalGainsConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`CapitalGainsError`] if:
    /// - either long-term threshold is not positive
    /// - the equity long-term exemption is negative
    /// - any rate is outside `[0, 100]`
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::calculations::{CapitalGainsConfig, CapitalGainsError};
    ///
    /// let invalid_config = CapitalGainsConfig {
    ///     non_equity_st_rate: dec!(-30),
    ///     ..CapitalGainsConfig::default()
    /// };
    ///
    /// let result = invalid_config.validate();
    /// assert_eq!(
    ///     result,
    ///     Err(CapitalGainsError::InvalidNonEquityStRate(dec!(-30)))
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), CapitalGainsError> {
        if self.real_estate_lt_threshold_months <= 0 {
            return Err(CapitalGainsError::InvalidRealEstateLtThreshold(
                self.real_estate_lt_threshold_months,
            ));
        }
        if self.default_lt_threshold_months <= 0 {
            return Err(CapitalGainsError::InvalidDefaultLtThreshold(
                self.default_lt_threshold_months,
            ));
        }
        if self.equity_lt_exemption < Decimal::ZERO {
            return Err(CapitalGainsError::InvalidEquityLtExemption(
                self.equity_lt_exemption,
            ));
        }
        if !rate_in_range(self.equity_lt_rate) {
            return Err(CapitalGainsError::InvalidEquityLtRate(self.equity_lt_rate));
        }
        if !rate_in_range(self.equity_st_rate) {
            return Err(CapitalGainsError::InvalidEquityStRate(self.equity_st_rate));
        }
        if !rate_in_range(self.non_equity_lt_rate) {
            return Err(CapitalGainsError::InvalidNonEquityLtRate(
                self.non_equity_lt_rate,
            ));
        }
        if !rate_in_range(self.non_equity_st_rate) {
            return Err(CapitalGainsError::InvalidNonEquityStRate(
                self.non_equity_st_rate,
            ));
        }
        Ok(())
    }
}

fn rate_in_range(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= dec!(100)
}

impl Default for CapitalGainsConfig {
    fn default() -> Self {
        Self {
            real_estate_lt_threshold_months: 24,
            default_lt_threshold_months: 12,
            equity_lt_exemption: EQUITY_LT_EXEMPTION,
            equity_lt_rate: dec!(10),
            equity_st_rate: dec!(15),
            non_equity_lt_rate: dec!(20),
            non_equity_st_rate: STCG_SLAB_APPROX_RATE,
        }
    }
}

/// Result of classifying and taxing one disposal.
///
/// Invariants: `taxable_gain = max(0, gain - exemption_applied)` and
/// `tax_amount = taxable_gain * rate / 100` (rounded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainResult {
    pub asset_class: AssetClass,
    pub holding_months: i64,
    pub is_long_term: bool,
    /// Disposal price less acquisition price; negative for a loss.
    pub gain: Decimal,
    pub exemption_applied: Decimal,
    pub taxable_gain: Decimal,
    pub rate: Decimal,
    pub tax_amount: Decimal,
}

/// Classifier for capital gains on asset disposals.
#[derive(Debug, Clone)]
pub struct CapitalGainsClassifier {
    config: CapitalGainsConfig,
}

impl CapitalGainsClassifier {
    pub fn new(config: CapitalGainsConfig) -> Self {
        Self { config }
    }

    /// Classifies a disposal and computes the tax on it.
    ///
    /// # Errors
    ///
    /// Returns [`CapitalGainsError::DisposalBeforeAcquisition`] when the
    /// dates are reversed, or a configuration error when the config fails
    /// [`CapitalGainsConfig::validate`].
    pub fn classify(
        &self,
        event: &DisposalEvent,
    ) -> Result<CapitalGainResult, CapitalGainsError> {
        self.config.validate()?;
        let holding_months = self.holding_months(event)?;
        let is_long_term = holding_months >= self.threshold_months(event.asset_class);

        let gain = event.disposal_price - event.acquisition_price;
        let exemption_applied = if is_long_term && event.asset_class.is_equity() {
            self.config.equity_lt_exemption
        } else {
            Decimal::ZERO
        };
        let taxable_gain = clamp_non_negative(gain - exemption_applied);
        let rate = self.rate(event.asset_class, is_long_term);
        let tax_amount = round_half_up(pct_of(taxable_gain, rate));

        Ok(CapitalGainResult {
            asset_class: event.asset_class,
            holding_months,
            is_long_term,
            gain,
            exemption_applied,
            taxable_gain,
            rate,
            tax_amount,
        })
    }

    /// Whole months held, as elapsed days divided by 30.
    fn holding_months(&self, event: &DisposalEvent) -> Result<i64, CapitalGainsError> {
        if event.disposal_date < event.acquisition_date {
            return Err(CapitalGainsError::DisposalBeforeAcquisition {
                acquisition: event.acquisition_date,
                disposal: event.disposal_date,
            });
        }
        Ok((event.disposal_date - event.acquisition_date).num_days() / 30)
    }

    fn threshold_months(&self, asset_class: AssetClass) -> i64 {
        match asset_class {
            AssetClass::RealEstate => self.config.real_estate_lt_threshold_months,
            _ => self.config.default_lt_threshold_months,
        }
    }

    fn rate(&self, asset_class: AssetClass, is_long_term: bool) -> Decimal {
        match (asset_class.is_equity(), is_long_term) {
            (true, true) => self.config.equity_lt_rate,
            (true, false) => self.config.equity_st_rate,
            (false, true) => self.config.non_equity_lt_rate,
            (false, false) => self.config.non_equity_st_rate,
        }
    }
}

impl Default for CapitalGainsClassifier {
    fn default() -> Self {
        Self::new(CapitalGainsConfig::default())
    }
}
