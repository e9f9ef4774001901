//! Dual-regime tax comparison.
//!
//! Runs the slab calculator once per regime and recommends the cheaper one:
//!
//! - **Old regime**: taxable income is gross less the standard deduction
//!   less all eligible section-wise deductions, on the old slab table.
//! - **New regime**: taxable income is gross less the standard deduction
//!   only, on the new slab table with generally lower marginal rates.
//!
//! When both regimes produce identical tax the recommendation falls back
//! to [`TIE_BREAK_REGIME`]. That default is a policy choice, kept as a
//! named constant so it cannot be mistaken for a derived fact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::deductions::DeductionTotals;
use crate::calculations::slab::{SlabCalculator, SlabError, TaxResult};
use crate::{RegimeSchedule, TaxRegime};

/// Regime recommended when both regimes produce exactly equal tax.
pub const TIE_BREAK_REGIME: TaxRegime = TaxRegime::Old;

/// Per-regime half of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeTaxSummary {
    pub regime: TaxRegime,
    pub standard_deduction: Decimal,
    /// Section-wise deductions actually allowed under the regime; zero for
    /// the new regime, which disallows them.
    pub eligible_deductions: Decimal,
    pub result: TaxResult,
}

/// Outcome of comparing the two regimes for one filer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub old: RegimeTaxSummary,
    pub new: RegimeTaxSummary,
    pub recommended: TaxRegime,
    /// Absolute difference between the two total-tax figures.
    pub savings: Decimal,
}

/// Comparator over the two regime schedules for one fiscal year.
#[derive(Debug, Clone)]
pub struct RegimeComparator<'a> {
    old: &'a RegimeSchedule,
    new: &'a RegimeSchedule,
}

impl<'a> RegimeComparator<'a> {
    pub fn new(old: &'a RegimeSchedule, new: &'a RegimeSchedule) -> Self {
        Self { old, new }
    }

    /// Computes tax under both regimes and recommends the strictly cheaper
    /// one, falling back to [`TIE_BREAK_REGIME`] on exact equality.
    ///
    /// # Errors
    ///
    /// Returns [`SlabError`] if either schedule's bracket table is empty.
    pub fn compare(
        &self,
        gross_income: Decimal,
        deductions: &DeductionTotals,
    ) -> Result<RegimeComparison, SlabError> {
        let old = self.regime_summary(self.old, gross_income, deductions.grand_total)?;
        let new = self.regime_summary(self.new, gross_income, Decimal::ZERO)?;

        let recommended = if old.result.total_tax < new.result.total_tax {
            TaxRegime::Old
        } else if new.result.total_tax < old.result.total_tax {
            TaxRegime::New
        } else {
            TIE_BREAK_REGIME
        };
        let savings = (old.result.total_tax - new.result.total_tax).abs();

        debug!(%recommended, %savings, "regime comparison complete");

        Ok(RegimeComparison {
            old,
            new,
            recommended,
            savings,
        })
    }

    fn regime_summary(
        &self,
        schedule: &RegimeSchedule,
        gross_income: Decimal,
        eligible_deductions: Decimal,
    ) -> Result<RegimeTaxSummary, SlabError> {
        let calculator = SlabCalculator::new(&schedule.brackets);
        let result =
            calculator.calculate(gross_income, schedule.standard_deduction + eligible_deductions)?;

        Ok(RegimeTaxSummary {
            regime: schedule.regime,
            standard_deduction: schedule.standard_deduction,
            eligible_deductions,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::deductions::DeductionAggregator;
    use crate::{DeductionEntry, DeductionSection, FiscalYear, TaxBracket};

    fn bracket(
        regime: TaxRegime,
        lower: Decimal,
        upper: Option<Decimal>,
        rate: Decimal,
    ) -> TaxBracket {
        TaxBracket {
            fiscal_year: FiscalYear::new(2024),
            regime,
            lower_bound: lower,
            upper_bound: upper,
            rate,
        }
    }

    fn old_schedule() -> RegimeSchedule {
        RegimeSchedule {
            fiscal_year: FiscalYear::new(2024),
            regime: TaxRegime::Old,
            standard_deduction: dec!(50000),
            brackets: vec![
                bracket(TaxRegime::Old, dec!(0), Some(dec!(250000)), dec!(0)),
                bracket(TaxRegime::Old, dec!(250000), Some(dec!(500000)), dec!(5)),
                bracket(TaxRegime::Old, dec!(500000), Some(dec!(1000000)), dec!(20)),
                bracket(TaxRegime::Old, dec!(1000000), None, dec!(30)),
            ],
        }
    }

    fn new_schedule() -> RegimeSchedule {
        RegimeSchedule {
            fiscal_year: FiscalYear::new(2024),
            regime: TaxRegime::New,
            standard_deduction: dec!(75000),
            brackets: vec![
                bracket(TaxRegime::New, dec!(0), Some(dec!(300000)), dec!(0)),
                bracket(TaxRegime::New, dec!(300000), Some(dec!(700000)), dec!(5)),
                bracket(TaxRegime::New, dec!(700000), Some(dec!(1000000)), dec!(10)),
                bracket(TaxRegime::New, dec!(1000000), Some(dec!(1200000)), dec!(15)),
                bracket(TaxRegime::New, dec!(1200000), Some(dec!(1500000)), dec!(20)),
                bracket(TaxRegime::New, dec!(1500000), None, dec!(30)),
            ],
        }
    }

    fn deductions(amount_80c: Decimal) -> DeductionTotals {
        let entries = vec![DeductionEntry {
            section: DeductionSection::Section80C,
            amount: amount_80c,
            fiscal_year: FiscalYear::new(2024),
        }];
        DeductionAggregator::aggregate(&entries, FiscalYear::new(2024))
    }

    // =========================================================================
    // compare tests
    // =========================================================================

    #[test]
    fn compare_new_regime_wins_with_modest_deductions() {
        let (old, new) = (old_schedule(), new_schedule());
        let comparator = RegimeComparator::new(&old, &new);

        let comparison = comparator
            .compare(dec!(1200000), &deductions(dec!(50000)))
            .unwrap();

        // Old: taxable 1100000 -> (12500 + 100000 + 30000) * 1.04 = 148200
        // New: taxable 1125000 -> (20000 + 30000 + 18750) * 1.04 = 71500
        assert_eq!(comparison.old.result.total_tax, dec!(148200.00));
        assert_eq!(comparison.new.result.total_tax, dec!(71500.00));
        assert_eq!(comparison.recommended, TaxRegime::New);
        assert_eq!(comparison.savings, dec!(76700.00));
    }

    #[test]
    fn compare_new_regime_ignores_section_deductions() {
        let (old, new) = (old_schedule(), new_schedule());
        let comparator = RegimeComparator::new(&old, &new);

        let with_deductions = comparator
            .compare(dec!(1200000), &deductions(dec!(150000)))
            .unwrap();
        let without = comparator
            .compare(dec!(1200000), &DeductionTotals::default())
            .unwrap();

        assert_eq!(
            with_deductions.new.result.total_tax,
            without.new.result.total_tax
        );
        assert_eq!(with_deductions.new.eligible_deductions, dec!(0));
    }

    #[test]
    fn compare_savings_is_monotone_in_deductions() {
        let (old, new) = (old_schedule(), new_schedule());
        let comparator = RegimeComparator::new(&old, &new);

        // New-regime tax is fixed at this income; growing deductions only
        // lower old-regime tax, so the savings attributed to the old regime
        // (new tax less old tax) never decrease.
        let mut previous_old_regime_savings = None;
        for amount in [dec!(0), dec!(50000), dec!(100000), dec!(150000)] {
            let comparison = comparator
                .compare(dec!(1200000), &deductions(amount))
                .unwrap();
            let old_regime_savings =
                comparison.new.result.total_tax - comparison.old.result.total_tax;
            if let Some(previous) = previous_old_regime_savings {
                assert!(old_regime_savings >= previous);
            }
            previous_old_regime_savings = Some(old_regime_savings);
        }
    }

    #[test]
    fn compare_equal_tax_falls_back_to_tie_break() {
        // Identical schedules force an exact tie.
        let old = old_schedule();
        let mut new = old_schedule();
        new.regime = TaxRegime::New;
        for b in &mut new.brackets {
            b.regime = TaxRegime::New;
        }
        let comparator = RegimeComparator::new(&old, &new);

        let comparison = comparator
            .compare(dec!(800000), &DeductionTotals::default())
            .unwrap();

        assert_eq!(comparison.savings, dec!(0));
        assert_eq!(comparison.recommended, TIE_BREAK_REGIME);
    }

    #[test]
    fn compare_empty_schedule_is_an_error() {
        let old = old_schedule();
        let mut new = new_schedule();
        new.brackets.clear();
        let comparator = RegimeComparator::new(&old, &new);

        let result = comparator.compare(dec!(800000), &DeductionTotals::default());

        assert_eq!(result, Err(SlabError::NoBrackets));
    }
}
