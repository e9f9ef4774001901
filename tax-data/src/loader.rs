use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{FiscalYear, RegimeSchedule, TaxBracket, TaxRegime};
use thiserror::Error;

/// Errors that can occur when loading statutory schedule data.
#[derive(Debug, Error)]
pub enum ScheduleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown regime code: {0}")]
    UnknownRegime(String),

    #[error("no brackets found for regime '{regime}' in fiscal year {fiscal_year}")]
    NoBrackets { fiscal_year: i32, regime: TaxRegime },

    #[error("no standard deduction found for regime '{regime}' in fiscal year {fiscal_year}")]
    MissingStandardDeduction { fiscal_year: i32, regime: TaxRegime },

    #[error("bracket table must start at zero, starts at {0}")]
    DoesNotStartAtZero(Decimal),

    #[error("bracket table has a gap or overlap: expected lower bound {expected}, found {found}")]
    GapOrOverlap { expected: Decimal, found: Decimal },

    #[error("bracket [{lower}, {upper}) has an upper bound at or below its lower bound")]
    InvertedBounds { lower: Decimal, upper: Decimal },

    #[error("only the last bracket may be open-ended")]
    OpenEndedNotLast,

    #[error("the last bracket must be open-ended")]
    MissingOpenEnd,
}

impl From<csv::Error> for ScheduleLoaderError {
    fn from(err: csv::Error) -> Self {
        ScheduleLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a bracket-table CSV file.
///
/// Columns:
/// - `fiscal_year`: start year of the fiscal year (e.g. 2024 for FY 2024-25)
/// - `regime`: regime code (`old` or `new`)
/// - `lower_bound`: inclusive lower income bound
/// - `upper_bound`: exclusive upper income bound (empty for open-ended)
/// - `rate`: marginal rate as a percentage (e.g. `20` for 20%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub fiscal_year: i32,
    pub regime: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

/// A single record from a standard-deduction CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StandardDeductionRecord {
    pub fiscal_year: i32,
    pub regime: String,
    pub amount: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for statutory regime schedules from CSV files.
///
/// Bracket tables and standard deductions arrive as separate versioned CSV
/// files (one row per bracket / per regime-year). [`ScheduleLoader::build_schedule`]
/// assembles and validates the table for one regime in one fiscal year;
/// the engine itself treats table structure as a precondition, so this is
/// the place malformed tables are caught.
pub struct ScheduleLoader;

impl ScheduleLoader {
    /// Parses bracket records from a CSV reader.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, ScheduleLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parses standard-deduction records from a CSV reader.
    pub fn parse_standard_deductions<R: Read>(
        reader: R,
    ) -> Result<Vec<StandardDeductionRecord>, ScheduleLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: StandardDeductionRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Assembles the validated schedule for one regime in one fiscal year.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleLoaderError`] when a regime code is unknown, the
    /// regime-year has no brackets or no standard deduction, or the
    /// bracket table is not an ascending, gap-free partition of `[0, inf)`
    /// ending in an open-ended bracket.
    pub fn build_schedule(
        brackets: &[BracketRecord],
        deductions: &[StandardDeductionRecord],
        fiscal_year: FiscalYear,
        regime: TaxRegime,
    ) -> Result<RegimeSchedule, ScheduleLoaderError> {
        let mut table = Vec::new();
        for record in brackets {
            let record_regime = parse_regime(&record.regime)?;
            if record.fiscal_year != fiscal_year.start_year || record_regime != regime {
                continue;
            }
            table.push(TaxBracket {
                fiscal_year,
                regime,
                lower_bound: record.lower_bound,
                upper_bound: record.upper_bound,
                rate: record.rate,
            });
        }
        if table.is_empty() {
            return Err(ScheduleLoaderError::NoBrackets {
                fiscal_year: fiscal_year.start_year,
                regime,
            });
        }
        table.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
        Self::validate_table(&table)?;

        let standard_deduction = deductions
            .iter()
            .find_map(|record| {
                let record_regime = parse_regime(&record.regime).ok()?;
                (record.fiscal_year == fiscal_year.start_year && record_regime == regime)
                    .then_some(record.amount)
            })
            .ok_or(ScheduleLoaderError::MissingStandardDeduction {
                fiscal_year: fiscal_year.start_year,
                regime,
            })?;

        Ok(RegimeSchedule {
            fiscal_year,
            regime,
            standard_deduction,
            brackets: table,
        })
    }

    /// Checks that a sorted table partitions `[0, inf)` with no gaps or
    /// overlaps and ends open-ended.
    fn validate_table(table: &[TaxBracket]) -> Result<(), ScheduleLoaderError> {
        let mut expected = Decimal::ZERO;

        for (index, bracket) in table.iter().enumerate() {
            if index == 0 && bracket.lower_bound != Decimal::ZERO {
                return Err(ScheduleLoaderError::DoesNotStartAtZero(bracket.lower_bound));
            }
            if bracket.lower_bound != expected {
                return Err(ScheduleLoaderError::GapOrOverlap {
                    expected,
                    found: bracket.lower_bound,
                });
            }
            match bracket.upper_bound {
                Some(upper) => {
                    if upper <= bracket.lower_bound {
                        return Err(ScheduleLoaderError::InvertedBounds {
                            lower: bracket.lower_bound,
                            upper,
                        });
                    }
                    if index == table.len() - 1 {
                        return Err(ScheduleLoaderError::MissingOpenEnd);
                    }
                    expected = upper;
                }
                None => {
                    if index != table.len() - 1 {
                        return Err(ScheduleLoaderError::OpenEndedNotLast);
                    }
                }
            }
        }

        Ok(())
    }
}

fn parse_regime(code: &str) -> Result<TaxRegime, ScheduleLoaderError> {
    TaxRegime::parse(code.trim())
        .ok_or_else(|| ScheduleLoaderError::UnknownRegime(code.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const BRACKETS_CSV: &str = "\
fiscal_year,regime,lower_bound,upper_bound,rate
2024,old,0,250000,0
2024,old,250000,500000,5
2024,old,500000,1000000,20
2024,old,1000000,,30
";

    const DEDUCTIONS_CSV: &str = "\
fiscal_year,regime,amount
2024,old,50000
2024,new,75000
";

    fn records() -> (Vec<BracketRecord>, Vec<StandardDeductionRecord>) {
        let brackets = ScheduleLoader::parse_brackets(BRACKETS_CSV.as_bytes()).unwrap();
        let deductions =
            ScheduleLoader::parse_standard_deductions(DEDUCTIONS_CSV.as_bytes()).unwrap();
        (brackets, deductions)
    }

    // =========================================================================
    // parse tests
    // =========================================================================

    #[test]
    fn parse_brackets_reads_all_rows() {
        let (brackets, _) = records();

        assert_eq!(brackets.len(), 4);
        assert_eq!(brackets[0].lower_bound, dec!(0));
        assert_eq!(brackets[3].upper_bound, None);
    }

    #[test]
    fn parse_brackets_empty_upper_bound_is_open_ended() {
        let (brackets, _) = records();

        assert_eq!(brackets[2].upper_bound, Some(dec!(1000000)));
        assert_eq!(brackets[3].upper_bound, None);
        assert_eq!(brackets[3].rate, dec!(30));
    }

    // =========================================================================
    // build_schedule tests
    // =========================================================================

    #[test]
    fn build_schedule_assembles_regime_year() {
        let (brackets, deductions) = records();

        let schedule = ScheduleLoader::build_schedule(
            &brackets,
            &deductions,
            FiscalYear::new(2024),
            TaxRegime::Old,
        )
        .unwrap();

        assert_eq!(schedule.standard_deduction, dec!(50000));
        assert_eq!(schedule.brackets.len(), 4);
        assert_eq!(schedule.brackets[3].upper_bound, None);
    }

    #[test]
    fn build_schedule_unknown_regime_code_is_rejected() {
        let (mut brackets, deductions) = records();
        brackets[0].regime = "middle".to_string();

        let result = ScheduleLoader::build_schedule(
            &brackets,
            &deductions,
            FiscalYear::new(2024),
            TaxRegime::Old,
        );

        assert!(matches!(
            result,
            Err(ScheduleLoaderError::UnknownRegime(code)) if code == "middle"
        ));
    }

    #[test]
    fn build_schedule_missing_year_has_no_brackets() {
        let (brackets, deductions) = records();

        let result = ScheduleLoader::build_schedule(
            &brackets,
            &deductions,
            FiscalYear::new(2023),
            TaxRegime::Old,
        );

        assert!(matches!(
            result,
            Err(ScheduleLoaderError::NoBrackets {
                fiscal_year: 2023,
                ..
            })
        ));
    }

    #[test]
    fn build_schedule_missing_standard_deduction_is_rejected() {
        let (brackets, _) = records();

        let result =
            ScheduleLoader::build_schedule(&brackets, &[], FiscalYear::new(2024), TaxRegime::Old);

        assert!(matches!(
            result,
            Err(ScheduleLoaderError::MissingStandardDeduction { .. })
        ));
    }

    #[test]
    fn build_schedule_detects_gap() {
        let (mut brackets, deductions) = records();
        // Open a gap between 500000 and 600000.
        brackets[2].upper_bound = Some(dec!(600000));

        let result = ScheduleLoader::build_schedule(
            &brackets,
            &deductions,
            FiscalYear::new(2024),
            TaxRegime::Old,
        );

        assert!(matches!(
            result,
            Err(ScheduleLoaderError::GapOrOverlap { .. })
        ));
    }

    #[test]
    fn build_schedule_detects_missing_open_end() {
        let (mut brackets, deductions) = records();
        brackets[3].upper_bound = Some(dec!(5000000));

        let result = ScheduleLoader::build_schedule(
            &brackets,
            &deductions,
            FiscalYear::new(2024),
            TaxRegime::Old,
        );

        assert!(matches!(result, Err(ScheduleLoaderError::MissingOpenEnd)));
    }

    #[test]
    fn build_schedule_detects_inverted_bounds() {
        let (mut brackets, deductions) = records();
        brackets[1].upper_bound = Some(dec!(200000));

        let result = ScheduleLoader::build_schedule(
            &brackets,
            &deductions,
            FiscalYear::new(2024),
            TaxRegime::Old,
        );

        assert!(matches!(
            result,
            Err(ScheduleLoaderError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn build_schedule_detects_table_not_starting_at_zero() {
        let (mut brackets, deductions) = records();
        brackets.remove(0);

        let result = ScheduleLoader::build_schedule(
            &brackets,
            &deductions,
            FiscalYear::new(2024),
            TaxRegime::Old,
        );

        assert!(matches!(
            result,
            Err(ScheduleLoaderError::DoesNotStartAtZero(b)) if b == dec!(250000)
        ));
    }
}
