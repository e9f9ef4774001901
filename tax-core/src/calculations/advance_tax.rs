//! Advance-tax installment scheduling.
//!
//! Derives the statutory quarterly pre-payment schedule from a full-year
//! liability estimate. Net payable is the total liability less tax already
//! withheld at source (TDS); when it reaches [`ADVANCE_TAX_THRESHOLD`] the
//! filer must pre-pay through four fixed calendar installments.
//!
//! # Cumulative semantics
//!
//! Each installment's `cumulative_amount_due` is the total advance tax that
//! must have been paid *by* that due date — 15%, 45%, 75% and 100% of net
//! payable — not the amount to pay in that quarter. The derived
//! `incremental_amount_due` carries the per-quarter payment so callers
//! never re-derive it by subtraction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::FiscalYear;
use crate::calculations::common::{clamp_non_negative, pct_of, round_half_up};

/// Net payable at or above which advance tax becomes mandatory.
pub const ADVANCE_TAX_THRESHOLD: Decimal = dec!(10000);

/// Cumulative share of net payable due at each statutory installment.
pub const CUMULATIVE_PERCENTAGES: [Decimal; 4] = [dec!(15), dec!(45), dec!(75), dec!(100)];

/// One statutory installment of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub quarter_label: String,
    pub due_date: NaiveDate,
    pub cumulative_percentage: Decimal,
    /// Total advance tax due by `due_date` (cumulative, not per-quarter).
    pub cumulative_amount_due: Decimal,
    /// Amount to pay in this quarter alone.
    pub incremental_amount_due: Decimal,
}

/// Full-year advance-tax position and, when required, the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceTaxSchedule {
    pub fiscal_year: FiscalYear,
    pub total_liability: Decimal,
    pub tds_already_paid: Decimal,
    pub net_payable: Decimal,
    /// True when `net_payable` meets [`ADVANCE_TAX_THRESHOLD`].
    pub required: bool,
    /// Exactly four installments when required, otherwise empty.
    pub installments: Vec<Installment>,
}

/// Scheduler for statutory advance-tax installments.
pub struct AdvanceTaxScheduler;

impl AdvanceTaxScheduler {
    /// Builds the schedule for one fiscal year.
    ///
    /// Negative liability or TDS inputs are clamped to zero; net payable is
    /// `max(0, liability - tds)`.
    pub fn schedule(
        total_liability: Decimal,
        tds_already_paid: Decimal,
        fiscal_year: FiscalYear,
    ) -> AdvanceTaxSchedule {
        let total_liability = clamp_non_negative(total_liability);
        let tds_already_paid = clamp_non_negative(tds_already_paid);
        let net_payable = clamp_non_negative(total_liability - tds_already_paid);
        let required = net_payable >= ADVANCE_TAX_THRESHOLD;

        let installments = if required {
            Self::installments(net_payable, fiscal_year)
        } else {
            Vec::new()
        };

        AdvanceTaxSchedule {
            fiscal_year,
            total_liability,
            tds_already_paid,
            net_payable,
            required,
            installments,
        }
    }

    fn installments(net_payable: Decimal, fiscal_year: FiscalYear) -> Vec<Installment> {
        let mut installments = Vec::with_capacity(CUMULATIVE_PERCENTAGES.len());
        let mut previous_cumulative = Decimal::ZERO;

        for (index, cumulative_percentage) in CUMULATIVE_PERCENTAGES.into_iter().enumerate() {
            let cumulative_amount_due = round_half_up(pct_of(net_payable, cumulative_percentage));
            let incremental_amount_due = cumulative_amount_due - previous_cumulative;
            previous_cumulative = cumulative_amount_due;

            installments.push(Installment {
                quarter_label: Self::quarter_label(index).to_string(),
                due_date: Self::due_date(index, fiscal_year),
                cumulative_percentage,
                cumulative_amount_due,
                incremental_amount_due,
            });
        }

        installments
    }

    fn quarter_label(index: usize) -> &'static str {
        match index {
            0 => "Q1",
            1 => "Q2",
            2 => "Q3",
            _ => "Q4",
        }
    }

    /// Statutory due dates: 15 Jun, 15 Sep, 15 Dec, then 15 Mar of the
    /// following calendar year.
    fn due_date(index: usize, fiscal_year: FiscalYear) -> NaiveDate {
        let (year, month) = match index {
            0 => (fiscal_year.start_year, 6),
            1 => (fiscal_year.start_year, 9),
            2 => (fiscal_year.start_year, 12),
            _ => (fiscal_year.start_year + 1, 3),
        };
        NaiveDate::from_ymd_opt(year, month, 15).expect("the 15th exists in every month")
    }
}
