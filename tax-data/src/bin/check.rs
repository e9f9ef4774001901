use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::{FiscalYear, TaxRegime};
use tax_data::ScheduleLoader;

/// Validate statutory schedule CSV files.
///
/// Parses a bracket-table CSV and a standard-deduction CSV, assembles the
/// schedule for each regime of the given fiscal year, and reports the
/// result. Fails when a table has gaps, overlaps, or no open-ended top
/// bracket.
#[derive(Parser, Debug)]
#[command(name = "tax-data-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the bracket-table CSV file
    #[arg(short, long)]
    brackets: PathBuf,

    /// Path to the standard-deduction CSV file
    #[arg(short, long)]
    deductions: PathBuf,

    /// Start year of the fiscal year to validate (e.g. 2024 for FY 2024-25)
    #[arg(short, long)]
    fiscal_year: i32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let fiscal_year = FiscalYear::new(args.fiscal_year);

    let brackets_file = File::open(&args.brackets)
        .with_context(|| format!("Failed to open: {}", args.brackets.display()))?;
    let brackets = ScheduleLoader::parse_brackets(brackets_file)
        .with_context(|| format!("Failed to parse CSV: {}", args.brackets.display()))?;
    println!("Parsed {} bracket records", brackets.len());

    let deductions_file = File::open(&args.deductions)
        .with_context(|| format!("Failed to open: {}", args.deductions.display()))?;
    let deductions = ScheduleLoader::parse_standard_deductions(deductions_file)
        .with_context(|| format!("Failed to parse CSV: {}", args.deductions.display()))?;
    println!("Parsed {} standard-deduction records", deductions.len());

    for regime in [TaxRegime::Old, TaxRegime::New] {
        let schedule =
            ScheduleLoader::build_schedule(&brackets, &deductions, fiscal_year, regime)
                .with_context(|| {
                    format!("Invalid schedule for {regime} regime, {}", fiscal_year.label())
                })?;
        println!(
            "{} {} regime: {} brackets, standard deduction {}",
            schedule.fiscal_year.label(),
            schedule.regime,
            schedule.brackets.len(),
            schedule.standard_deduction,
        );
    }

    println!("All schedules valid.");

    Ok(())
}
