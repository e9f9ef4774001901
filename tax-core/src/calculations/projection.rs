//! Income, deduction, and tax projection.
//!
//! Two modes over one regime schedule:
//!
//! - **In-year**: extrapolates income observed so far in the current
//!   fiscal year to a full-year figure at the same average monthly rate,
//!   recomputes tax, and turns the unused deduction headroom into a
//!   monthly investment recommendation with the tax saved if the headroom
//!   were fully used.
//! - **Multi-year**: compounds income forward over N fiscal years at a
//!   given growth rate, with deduction growth deliberately capped at
//!   [`DEDUCTION_GROWTH_CAP_PCT`] to model conservative reinvestment, and
//!   computes per-period tax plus aggregate totals.
//!
//! Both modes are pure functions of their inputs: the "current date" is an
//! explicit parameter, never read from the clock.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{clamp_non_negative, round_half_up};
use crate::calculations::deductions::DeductionTotals;
use crate::calculations::slab::{SlabCalculator, SlabError, TaxResult};
use crate::{FiscalYear, RegimeSchedule};

/// Ceiling on the growth rate applied to deductions in multi-year
/// projections, in percent. Income may grow faster; statutory deduction
/// room does not.
pub const DEDUCTION_GROWTH_CAP_PCT: Decimal = dec!(5);

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Inputs for an in-year projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InYearProjectionInput {
    pub fiscal_year: FiscalYear,
    /// The injected "current date"; months elapsed derive from it.
    pub as_of: NaiveDate,
    /// Income earned from the start of the fiscal year to `as_of`.
    pub income_to_date: Decimal,
    /// Deductions claimed so far this fiscal year.
    pub deductions_to_date: DeductionTotals,
}

/// Result of an in-year projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InYearProjection {
    pub months_elapsed: u32,
    pub remaining_months: u32,
    /// Full-year income at the observed average monthly rate.
    pub projected_income: Decimal,
    /// Tax on the projected income with deductions as they stand.
    pub projected_tax: TaxResult,
    /// Unused ceiling across capped deduction sections.
    pub remaining_deduction_headroom: Decimal,
    /// Headroom spread evenly over the remaining months; zero when no
    /// months remain.
    pub monthly_investment_recommendation: Decimal,
    /// Tax saved if the remaining headroom were fully invested.
    pub potential_savings: Decimal,
}

/// Inputs for a multi-year projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiYearProjectionInput {
    /// First projected fiscal year.
    pub base_fiscal_year: FiscalYear,
    pub base_income: Decimal,
    pub base_deductions: Decimal,
    /// Number of fiscal years to project.
    pub years: u32,
    /// Annual income growth, in percent.
    pub annual_growth_rate_pct: Decimal,
}

/// One projected fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedPeriod {
    pub period_label: String,
    pub income: Decimal,
    pub deductions: Decimal,
    pub tax: Decimal,
    pub effective_rate: Decimal,
}

/// Multi-year projection series with aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiYearProjection {
    pub periods: Vec<ProjectedPeriod>,
    pub total_income: Decimal,
    pub total_tax: Decimal,
    /// Mean of the per-period effective rates; zero for an empty series.
    pub average_effective_rate: Decimal,
}

/// Projection engine over one regime schedule.
#[derive(Debug, Clone)]
pub struct ProjectionEngine<'a> {
    schedule: &'a RegimeSchedule,
}

impl<'a> ProjectionEngine<'a> {
    pub fn new(schedule: &'a RegimeSchedule) -> Self {
        Self { schedule }
    }

    /// Projects the current fiscal year to completion.
    ///
    /// Income extrapolates at the observed average monthly rate; with zero
    /// months elapsed there is no observed rate and income-to-date is used
    /// as-is.
    ///
    /// # Errors
    ///
    /// Returns [`SlabError`] if the schedule's bracket table is empty.
    pub fn project_in_year(
        &self,
        input: &InYearProjectionInput,
    ) -> Result<InYearProjection, SlabError> {
        let months_elapsed = input.fiscal_year.months_elapsed(input.as_of);
        let remaining_months = 12 - months_elapsed;
        let income_to_date = clamp_non_negative(input.income_to_date);

        let projected_income = if months_elapsed == 0 {
            income_to_date
        } else {
            round_half_up(income_to_date / Decimal::from(months_elapsed) * MONTHS_PER_YEAR)
        };

        let calculator = SlabCalculator::new(&self.schedule.brackets);
        let deductions_now = input.deductions_to_date.grand_total;
        let projected_tax = calculator.calculate(
            projected_income,
            self.schedule.standard_deduction + deductions_now,
        )?;

        let remaining_deduction_headroom = input.deductions_to_date.remaining_headroom();
        let monthly_investment_recommendation = if remaining_months == 0 {
            Decimal::ZERO
        } else {
            round_half_up(remaining_deduction_headroom / Decimal::from(remaining_months))
        };

        let tax_if_headroom_used = calculator.calculate(
            projected_income,
            self.schedule.standard_deduction + deductions_now + remaining_deduction_headroom,
        )?;
        let potential_savings =
            clamp_non_negative(projected_tax.total_tax - tax_if_headroom_used.total_tax);

        Ok(InYearProjection {
            months_elapsed,
            remaining_months,
            projected_income,
            projected_tax,
            remaining_deduction_headroom,
            monthly_investment_recommendation,
            potential_savings,
        })
    }

    /// Projects income, deductions, and tax over `years` fiscal years.
    ///
    /// Each period derives from the previous by compounding: income by the
    /// full growth rate, deductions by the rate capped at
    /// [`DEDUCTION_GROWTH_CAP_PCT`].
    ///
    /// # Errors
    ///
    /// Returns [`SlabError`] if the schedule's bracket table is empty.
    pub fn project_multi_year(
        &self,
        input: &MultiYearProjectionInput,
    ) -> Result<MultiYearProjection, SlabError> {
        let calculator = SlabCalculator::new(&self.schedule.brackets);
        let income_factor = Decimal::ONE + input.annual_growth_rate_pct / dec!(100);
        let deduction_factor = Decimal::ONE
            + input.annual_growth_rate_pct.min(DEDUCTION_GROWTH_CAP_PCT) / dec!(100);

        let mut periods = Vec::with_capacity(input.years as usize);
        let mut income = clamp_non_negative(input.base_income);
        let mut deductions = clamp_non_negative(input.base_deductions);
        let mut fiscal_year = input.base_fiscal_year;
        let mut total_income = Decimal::ZERO;
        let mut total_tax = Decimal::ZERO;
        let mut rate_sum = Decimal::ZERO;

        for _ in 0..input.years {
            let result =
                calculator.calculate(income, self.schedule.standard_deduction + deductions)?;

            total_income += income;
            total_tax += result.total_tax;
            rate_sum += result.effective_rate;
            periods.push(ProjectedPeriod {
                period_label: fiscal_year.label(),
                income: round_half_up(income),
                deductions: round_half_up(deductions),
                tax: result.total_tax,
                effective_rate: result.effective_rate,
            });

            income *= income_factor;
            deductions *= deduction_factor;
            fiscal_year = fiscal_year.next();
        }

        let average_effective_rate = if periods.is_empty() {
            Decimal::ZERO
        } else {
            round_half_up(rate_sum / Decimal::from(periods.len() as u32))
        };

        Ok(MultiYearProjection {
            periods,
            total_income: round_half_up(total_income),
            total_tax: round_half_up(total_tax),
            average_effective_rate,
        })
    }
}
