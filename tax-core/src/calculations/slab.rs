//! Progressive-slab income-tax calculation.
//!
//! Implements the bracket-wise computation used by every other part of the
//! engine: taxable income is walked through an ordered slab table, each
//! bracket taxes only the portion of income falling inside it, and a flat
//! health-and-education cess is applied on the accumulated base tax.
//!
//! # Algorithm
//!
//! For each bracket in ascending order, if taxable income is at or below
//! the bracket's lower bound the walk stops. Otherwise the portion
//! `min(taxable, upper) - lower` is taxed at the bracket's marginal rate
//! and recorded in the breakdown. The last bracket of a well-formed table
//! is open-ended (`upper_bound: None`).
//!
//! Tables with gaps or overlaps are a caller precondition, not detected
//! here; per-bracket portions are clamped to zero so a malformed table can
//! never produce negative tax.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::{CESS_RATE, SlabCalculator};
//! use tax_core::{FiscalYear, TaxBracket, TaxRegime};
//!
//! let fy = FiscalYear::new(2024);
//! let brackets = vec![
//!     TaxBracket {
//!         fiscal_year: fy,
//!         regime: TaxRegime::Old,
//!         lower_bound: dec!(0),
//!         upper_bound: Some(dec!(250000)),
//!         rate: dec!(0),
//!     },
//!     TaxBracket {
//!         fiscal_year: fy,
//!         regime: TaxRegime::Old,
//!         lower_bound: dec!(250000),
//!         upper_bound: Some(dec!(500000)),
//!         rate: dec!(5),
//!     },
//!     TaxBracket {
//!         fiscal_year: fy,
//!         regime: TaxRegime::Old,
//!         lower_bound: dec!(500000),
//!         upper_bound: Some(dec!(1000000)),
//!         rate: dec!(20),
//!     },
//!     TaxBracket {
//!         fiscal_year: fy,
//!         regime: TaxRegime::Old,
//!         lower_bound: dec!(1000000),
//!         upper_bound: None,
//!         rate: dec!(30),
//!     },
//! ];
//!
//! let calculator = SlabCalculator::new(&brackets);
//! let result = calculator.calculate(dec!(1200000), dec!(200000)).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(1000000));
//! assert_eq!(result.base_tax, dec!(112500.00));
//! assert_eq!(result.cess, dec!(4500.00));
//! assert_eq!(result.total_tax, dec!(117000.00));
//! assert_eq!(result.effective_rate, dec!(9.75));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::TaxBracket;
use crate::calculations::common::{clamp_non_negative, pct_of, round_half_up};

/// Health and education cess, applied flat on the accumulated base tax.
pub const CESS_RATE: Decimal = dec!(0.04);

/// Errors that can occur during slab tax calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlabError {
    /// No tax brackets were provided for the calculation.
    #[error("no tax brackets provided")]
    NoBrackets,
}

/// Tax attributable to a single bracket of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub taxable_portion: Decimal,
    pub tax_in_bracket: Decimal,
}

/// Complete result of a slab tax calculation.
///
/// Invariants: `total_tax = base_tax + cess`, `cess = base_tax * CESS_RATE`
/// (rounded), and the breakdown's `tax_in_bracket` values sum to `base_tax`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub gross_income: Decimal,
    pub taxable_income: Decimal,
    pub base_tax: Decimal,
    pub cess: Decimal,
    pub total_tax: Decimal,
    /// Total tax as a percentage of gross income; zero when gross income
    /// is zero.
    pub effective_rate: Decimal,
    pub bracket_breakdown: Vec<BracketTax>,
}

/// Calculator for progressive-slab income tax.
///
/// Borrows an ordered, gap-free bracket table; see the module docs for the
/// table preconditions.
#[derive(Debug, Clone)]
pub struct SlabCalculator<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> SlabCalculator<'a> {
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Computes tax on `gross_income` less `total_deductions`.
    ///
    /// Negative inputs are clamped to zero at the boundary. Taxable income
    /// is `max(0, gross - deductions)`.
    ///
    /// # Errors
    ///
    /// Returns [`SlabError::NoBrackets`] if the bracket table is empty.
    pub fn calculate(
        &self,
        gross_income: Decimal,
        total_deductions: Decimal,
    ) -> Result<TaxResult, SlabError> {
        if self.brackets.is_empty() {
            return Err(SlabError::NoBrackets);
        }

        if gross_income < Decimal::ZERO {
            warn!(%gross_income, "negative gross income clamped to zero");
        }
        let gross_income = clamp_non_negative(gross_income);
        let total_deductions = clamp_non_negative(total_deductions);
        let taxable_income = round_half_up(clamp_non_negative(gross_income - total_deductions));

        let bracket_breakdown = self.breakdown(taxable_income);
        let base_tax = bracket_breakdown
            .iter()
            .map(|b| b.tax_in_bracket)
            .sum::<Decimal>();
        let cess = round_half_up(base_tax * CESS_RATE);
        let total_tax = base_tax + cess;
        let effective_rate = self.effective_rate(total_tax, gross_income);

        Ok(TaxResult {
            gross_income,
            taxable_income,
            base_tax,
            cess,
            total_tax,
            effective_rate,
            bracket_breakdown,
        })
    }

    /// Walks the slab table and taxes the portion of income in each bracket.
    fn breakdown(&self, taxable_income: Decimal) -> Vec<BracketTax> {
        let mut entries = Vec::new();

        for bracket in self.brackets {
            if taxable_income <= bracket.lower_bound {
                break;
            }

            let ceiling = match bracket.upper_bound {
                Some(upper) => taxable_income.min(upper),
                None => taxable_income,
            };
            // Clamp guards against overlapping tables producing negative
            // portions.
            let taxable_portion = clamp_non_negative(ceiling - bracket.lower_bound);
            let tax_in_bracket = round_half_up(pct_of(taxable_portion, bracket.rate));

            entries.push(BracketTax {
                lower_bound: bracket.lower_bound,
                upper_bound: bracket.upper_bound,
                rate: bracket.rate,
                taxable_portion,
                tax_in_bracket,
            });
        }

        entries
    }

    /// Total tax as a percentage of gross income, zero for zero income.
    fn effective_rate(&self, total_tax: Decimal, gross_income: Decimal) -> Decimal {
        if gross_income.is_zero() {
            Decimal::ZERO
        } else {
            round_half_up(total_tax / gross_income * dec!(100))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{FiscalYear, TaxRegime};

    fn bracket(
        lower: Decimal,
        upper: Option<Decimal>,
        rate: Decimal,
    ) -> TaxBracket {
        TaxBracket {
            fiscal_year: FiscalYear::new(2024),
            regime: TaxRegime::Old,
            lower_bound: lower,
            upper_bound: upper,
            rate,
        }
    }

    fn old_regime_brackets() -> Vec<TaxBracket> {
        vec![
            bracket(dec!(0), Some(dec!(250000)), dec!(0)),
            bracket(dec!(250000), Some(dec!(500000)), dec!(5)),
            bracket(dec!(500000), Some(dec!(1000000)), dec!(20)),
            bracket(dec!(1000000), None, dec!(30)),
        ]
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_zero_income_is_zero_tax() {
        let brackets = old_regime_brackets();
        let calculator = SlabCalculator::new(&brackets);

        let result = calculator.calculate(dec!(0), dec!(0)).unwrap();

        assert_eq!(result.total_tax, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
        assert_eq!(result.bracket_breakdown, vec![]);
    }

    #[test]
    fn calculate_income_within_first_nonzero_bracket() {
        let brackets = old_regime_brackets();
        let calculator = SlabCalculator::new(&brackets);

        let result = calculator.calculate(dec!(400000), dec!(0)).unwrap();

        // Base: (400000 - 250000) * 5% = 7500; cess 4% = 300
        assert_eq!(result.base_tax, dec!(7500.00));
        assert_eq!(result.total_tax, dec!(7800.00));
    }

    #[test]
    fn calculate_spans_multiple_brackets() {
        let brackets = old_regime_brackets();
        let calculator = SlabCalculator::new(&brackets);

        let result = calculator.calculate(dec!(1000000), dec!(0)).unwrap();

        // 250000 * 5% + 500000 * 20% = 12500 + 100000 = 112500
        assert_eq!(result.base_tax, dec!(112500.00));
        assert_eq!(result.cess, dec!(4500.00));
        assert_eq!(result.total_tax, dec!(117000.00));
    }

    #[test]
    fn calculate_reaches_open_ended_top_bracket() {
        let brackets = old_regime_brackets();
        let calculator = SlabCalculator::new(&brackets);

        let result = calculator.calculate(dec!(1500000), dec!(0)).unwrap();

        // 12500 + 100000 + 500000 * 30% = 262500
        assert_eq!(result.base_tax, dec!(262500.00));
        let top = result.bracket_breakdown.last().unwrap();
        assert_eq!(top.upper_bound, None);
        assert_eq!(top.taxable_portion, dec!(500000));
    }

    #[test]
    fn calculate_breakdown_sums_to_base_tax() {
        let brackets = old_regime_brackets();
        let calculator = SlabCalculator::new(&brackets);

        let result = calculator.calculate(dec!(1234567.89), dec!(78901.23)).unwrap();

        let sum: Decimal = result
            .bracket_breakdown
            .iter()
            .map(|b| b.tax_in_bracket)
            .sum();
        assert_eq!(sum, result.base_tax);
        assert_eq!(result.total_tax, result.base_tax + result.cess);
    }

    #[test]
    fn calculate_breakdown_is_ordered_and_non_negative() {
        let brackets = old_regime_brackets();
        let calculator = SlabCalculator::new(&brackets);

        let result = calculator.calculate(dec!(1200000), dec!(200000)).unwrap();

        assert_eq!(result.taxable_income, dec!(1000000));
        for pair in result.bracket_breakdown.windows(2) {
            assert!(pair[0].lower_bound < pair[1].lower_bound);
        }
        for entry in &result.bracket_breakdown {
            assert!(entry.taxable_portion >= Decimal::ZERO);
            assert!(entry.tax_in_bracket >= Decimal::ZERO);
        }
    }

    #[test]
    fn calculate_clamps_negative_income_to_zero() {
        let brackets = old_regime_brackets();
        let calculator = SlabCalculator::new(&brackets);

        let result = calculator.calculate(dec!(-50000), dec!(0)).unwrap();

        assert_eq!(result.gross_income, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn calculate_deductions_exceeding_income_gives_zero_taxable() {
        let brackets = old_regime_brackets();
        let calculator = SlabCalculator::new(&brackets);

        let result = calculator.calculate(dec!(100000), dec!(300000)).unwrap();

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn calculate_empty_table_is_an_error() {
        let brackets: Vec<TaxBracket> = vec![];
        let calculator = SlabCalculator::new(&brackets);

        let result = calculator.calculate(dec!(100000), dec!(0));

        assert_eq!(result, Err(SlabError::NoBrackets));
    }

    #[test]
    fn calculate_overlapping_table_never_goes_negative() {
        // Malformed on purpose: second bracket starts above the income.
        let brackets = vec![
            bracket(dec!(0), Some(dec!(500000)), dec!(5)),
            bracket(dec!(400000), Some(dec!(300000)), dec!(20)),
        ];
        let calculator = SlabCalculator::new(&brackets);

        let result = calculator.calculate(dec!(450000), dec!(0)).unwrap();

        assert!(result.base_tax >= Decimal::ZERO);
        for entry in &result.bracket_breakdown {
            assert!(entry.tax_in_bracket >= Decimal::ZERO);
        }
    }

    #[test]
    fn calculate_effective_rate_uses_gross_income() {
        let brackets = old_regime_brackets();
        let calculator = SlabCalculator::new(&brackets);

        let result = calculator.calculate(dec!(1200000), dec!(200000)).unwrap();

        // 117000 / 1200000 * 100 = 9.75
        assert_eq!(result.effective_rate, dec!(9.75));
    }
}
