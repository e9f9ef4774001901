//! Section-wise deduction aggregation.
//!
//! Sums claimed deduction entries by statutory section, applies per-section
//! ceilings, and reports the capped grand total that feeds taxable-income
//! computation. Also tracks the unused headroom of capped sections, which
//! the in-year projection turns into an investment recommendation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{clamp_non_negative, round_half_up};
use crate::{DeductionEntry, DeductionSection, FiscalYear};

/// Claimed and allowed totals for one deduction section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTotal {
    pub section: DeductionSection,
    /// Sum of all entries claimed under the section.
    pub claimed: Decimal,
    /// Claimed amount after the statutory cap, if the section has one.
    pub allowed: Decimal,
    pub cap: Option<Decimal>,
}

/// Aggregated deduction totals for one fiscal year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionTotals {
    /// Per-section totals in statutory section order; sections with no
    /// entries are omitted.
    pub sections: Vec<SectionTotal>,
    /// Sum of the allowed amounts across all sections.
    pub grand_total: Decimal,
}

impl DeductionTotals {
    /// Allowed amount for a section, zero if nothing was claimed under it.
    pub fn allowed_for(&self, section: DeductionSection) -> Decimal {
        self.sections
            .iter()
            .find(|s| s.section == section)
            .map(|s| s.allowed)
            .unwrap_or(Decimal::ZERO)
    }

    /// Unused ceiling across all capped sections.
    ///
    /// Uncapped sections contribute nothing: there is no statutory limit
    /// left to fill.
    pub fn remaining_headroom(&self) -> Decimal {
        DeductionSection::ALL
            .iter()
            .filter_map(|section| {
                section
                    .statutory_cap()
                    .map(|cap| clamp_non_negative(cap - self.allowed_for(*section)))
            })
            .sum()
    }
}

/// Aggregator for deduction entry snapshots.
pub struct DeductionAggregator;

impl DeductionAggregator {
    /// Aggregates the entries claimed for `fiscal_year`.
    ///
    /// Entries for other fiscal years are ignored. Negative entry amounts
    /// are clamped to zero. For capped sections the allowed amount is
    /// `min(sum, cap)`; uncapped sections pass through unmodified.
    pub fn aggregate(
        entries: &[DeductionEntry],
        fiscal_year: FiscalYear,
    ) -> DeductionTotals {
        let mut sections = Vec::new();
        let mut grand_total = Decimal::ZERO;

        for section in DeductionSection::ALL {
            let claimed: Decimal = entries
                .iter()
                .filter(|e| e.fiscal_year == fiscal_year && e.section == section)
                .map(|e| clamp_non_negative(e.amount))
                .sum();
            if claimed.is_zero() {
                continue;
            }

            let claimed = round_half_up(claimed);
            let cap = section.statutory_cap();
            let allowed = match cap {
                Some(cap) => claimed.min(cap),
                None => claimed,
            };

            grand_total += allowed;
            sections.push(SectionTotal {
                section,
                claimed,
                allowed,
                cap,
            });
        }

        DeductionTotals {
            sections,
            grand_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn entry(section: DeductionSection, amount: Decimal) -> DeductionEntry {
        DeductionEntry {
            section,
            amount,
            fiscal_year: FiscalYear::new(2024),
        }
    }

    // =========================================================================
    // aggregate tests
    // =========================================================================

    #[test]
    fn aggregate_sums_entries_within_section() {
        let entries = vec![
            entry(DeductionSection::Section80C, dec!(50000)),
            entry(DeductionSection::Section80C, dec!(60000)),
        ];

        let totals = DeductionAggregator::aggregate(&entries, FiscalYear::new(2024));

        assert_eq!(totals.allowed_for(DeductionSection::Section80C), dec!(110000));
        assert_eq!(totals.grand_total, dec!(110000));
    }

    #[test]
    fn aggregate_caps_section_80c_at_ceiling() {
        let entries = vec![
            entry(DeductionSection::Section80C, dec!(100000)),
            entry(DeductionSection::Section80C, dec!(100000)),
        ];

        let totals = DeductionAggregator::aggregate(&entries, FiscalYear::new(2024));

        let section = &totals.sections[0];
        assert_eq!(section.claimed, dec!(200000));
        assert_eq!(section.allowed, dec!(150000));
        assert_eq!(totals.grand_total, dec!(150000));
    }

    #[test]
    fn aggregate_caps_health_insurance_separately() {
        let entries = vec![entry(DeductionSection::Section80D, dec!(40000))];

        let totals = DeductionAggregator::aggregate(&entries, FiscalYear::new(2024));

        assert_eq!(totals.allowed_for(DeductionSection::Section80D), dec!(25000));
    }

    #[test]
    fn aggregate_passes_uncapped_sections_through() {
        let entries = vec![entry(DeductionSection::Section80G, dec!(500000))];

        let totals = DeductionAggregator::aggregate(&entries, FiscalYear::new(2024));

        assert_eq!(totals.allowed_for(DeductionSection::Section80G), dec!(500000));
    }

    #[test]
    fn aggregate_ignores_other_fiscal_years() {
        let entries = vec![
            entry(DeductionSection::Section80C, dec!(50000)),
            DeductionEntry {
                section: DeductionSection::Section80C,
                amount: dec!(90000),
                fiscal_year: FiscalYear::new(2023),
            },
        ];

        let totals = DeductionAggregator::aggregate(&entries, FiscalYear::new(2024));

        assert_eq!(totals.grand_total, dec!(50000));
    }

    #[test]
    fn aggregate_clamps_negative_amounts() {
        let entries = vec![
            entry(DeductionSection::Section80C, dec!(50000)),
            entry(DeductionSection::Section80C, dec!(-20000)),
        ];

        let totals = DeductionAggregator::aggregate(&entries, FiscalYear::new(2024));

        assert_eq!(totals.grand_total, dec!(50000));
    }

    #[test]
    fn aggregate_empty_entries_is_zero() {
        let totals = DeductionAggregator::aggregate(&[], FiscalYear::new(2024));

        assert_eq!(totals.sections, vec![]);
        assert_eq!(totals.grand_total, dec!(0));
    }

    // =========================================================================
    // remaining_headroom tests
    // =========================================================================

    #[test]
    fn headroom_is_full_cap_sum_when_nothing_claimed() {
        let totals = DeductionAggregator::aggregate(&[], FiscalYear::new(2024));

        // 150000 + 50000 + 25000 + 200000 + 10000
        assert_eq!(totals.remaining_headroom(), dec!(435000));
    }

    #[test]
    fn headroom_shrinks_with_claims() {
        let entries = vec![
            entry(DeductionSection::Section80C, dec!(100000)),
            entry(DeductionSection::Section80D, dec!(25000)),
        ];

        let totals = DeductionAggregator::aggregate(&entries, FiscalYear::new(2024));

        // 50000 left in 80C, 0 in 80D, the rest untouched
        assert_eq!(totals.remaining_headroom(), dec!(310000));
    }

    #[test]
    fn headroom_ignores_uncapped_sections() {
        let entries = vec![entry(DeductionSection::Section80G, dec!(1000000))];

        let totals = DeductionAggregator::aggregate(&entries, FiscalYear::new(2024));

        assert_eq!(totals.remaining_headroom(), dec!(435000));
    }
}
