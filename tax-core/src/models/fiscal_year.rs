use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// An Indian fiscal year (1 April to 31 March), identified by its start year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FiscalYear {
    pub start_year: i32,
}

impl FiscalYear {
    pub fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    /// The fiscal year containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        if date.month() >= 4 {
            Self::new(date.year())
        } else {
            Self::new(date.year() - 1)
        }
    }

    pub fn start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start_year, 4, 1).expect("1 April is a valid date")
    }

    pub fn end(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start_year + 1, 3, 31).expect("31 March is a valid date")
    }

    pub fn next(&self) -> Self {
        Self::new(self.start_year + 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start() && date <= self.end()
    }

    /// Months of the fiscal year elapsed as of the given date, counting the
    /// month in progress. Clamped to 0 before the year starts and 12 after
    /// it ends.
    pub fn months_elapsed(&self, as_of: NaiveDate) -> u32 {
        if as_of < self.start() {
            return 0;
        }
        if as_of > self.end() {
            return 12;
        }
        if as_of.month() >= 4 {
            as_of.month() - 3
        } else {
            as_of.month() + 9
        }
    }

    /// Display label, e.g. "FY 2024-25".
    pub fn label(&self) -> String {
        format!(
            "FY {}-{:02}",
            self.start_year,
            (self.start_year + 1).rem_euclid(100)
        )
    }
}

impl std::fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
