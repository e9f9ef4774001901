//! Statutory configuration loading for the tax engine.
//!
//! Bracket tables and standard deductions are versioned CSV files, one row
//! per bracket (or per regime-year for deductions). This crate parses and
//! validates them into `tax_core::RegimeSchedule` values; reference tables
//! for FY 2024-25 ship in `data/`.

mod loader;

pub use loader::{BracketRecord, ScheduleLoader, ScheduleLoaderError, StandardDeductionRecord};
