//! Command-line front end for the tax computation engine.
//!
//! Loads statutory schedules from CSV files and exposes the engine's entry
//! points as subcommands. All parsing and printing lives here; the engine
//! itself performs no I/O.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tax_core::calculations::{
    AdvanceTaxScheduler, CapitalGainsClassifier, DeductionAggregator, DeductionTotals,
    InYearProjectionInput, MultiYearProjectionInput, ProjectionEngine, RegimeComparator,
    SlabCalculator, TaxResult, asset_class_from_code,
};
use tax_core::{DeductionEntry, DeductionSection, DisposalEvent, FiscalYear, RegimeSchedule, TaxRegime};
use tax_data::ScheduleLoader;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tax-cli")]
#[command(version, about = "Personal income-tax computation engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Statutory table files and the fiscal year they are read for.
#[derive(Args, Debug)]
struct ScheduleArgs {
    /// Path to the bracket-table CSV file
    #[arg(long)]
    brackets: PathBuf,

    /// Path to the standard-deduction CSV file
    #[arg(long)]
    standard_deductions: PathBuf,

    /// Start year of the fiscal year (e.g. 2024 for FY 2024-25)
    #[arg(long)]
    fiscal_year: i32,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute slab tax under one regime
    Slab {
        #[command(flatten)]
        schedule: ScheduleArgs,

        /// Regime code: old or new
        #[arg(long, default_value = "old")]
        regime: String,

        /// Gross annual income
        #[arg(long)]
        income: Decimal,

        /// Deduction entries as SECTION=AMOUNT (e.g. 80C=150000), repeatable
        #[arg(long = "deduction")]
        deductions: Vec<String>,
    },

    /// Compare the old and new regimes and recommend the cheaper one
    Compare {
        #[command(flatten)]
        schedule: ScheduleArgs,

        #[arg(long)]
        income: Decimal,

        #[arg(long = "deduction")]
        deductions: Vec<String>,
    },

    /// Classify an asset disposal and compute the capital-gains tax
    Gains {
        /// Asset class: listed-equity, equity-fund, real-estate, bond, gold, other
        #[arg(long)]
        asset_class: String,

        #[arg(long)]
        cost: Decimal,

        #[arg(long)]
        proceeds: Decimal,

        /// Acquisition date (YYYY-MM-DD)
        #[arg(long)]
        acquired: NaiveDate,

        /// Disposal date (YYYY-MM-DD)
        #[arg(long)]
        disposed: NaiveDate,
    },

    /// Derive the quarterly advance-tax schedule from full-year inputs
    AdvanceTax {
        #[command(flatten)]
        schedule: ScheduleArgs,

        #[arg(long, default_value = "old")]
        regime: String,

        #[arg(long)]
        income: Decimal,

        #[arg(long = "deduction")]
        deductions: Vec<String>,

        /// Tax already withheld at source
        #[arg(long, default_value = "0")]
        tds: Decimal,
    },

    /// Project the current fiscal year to completion
    ProjectYear {
        #[command(flatten)]
        schedule: ScheduleArgs,

        #[arg(long, default_value = "old")]
        regime: String,

        /// Treat this date as "today" (YYYY-MM-DD)
        #[arg(long)]
        as_of: NaiveDate,

        /// Income earned since the start of the fiscal year
        #[arg(long)]
        income_to_date: Decimal,

        #[arg(long = "deduction")]
        deductions: Vec<String>,
    },

    /// Project income, deductions, and tax over multiple fiscal years
    ProjectMulti {
        #[command(flatten)]
        schedule: ScheduleArgs,

        #[arg(long, default_value = "new")]
        regime: String,

        #[arg(long)]
        income: Decimal,

        #[arg(long, default_value = "0")]
        base_deductions: Decimal,

        #[arg(long)]
        years: u32,

        /// Annual income growth rate, in percent
        #[arg(long)]
        growth: Decimal,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Slab {
            schedule,
            regime,
            income,
            deductions,
        } => {
            let schedule = load_schedule(&schedule, &regime)?;
            let totals = aggregate_deductions(&deductions, schedule.fiscal_year)?;
            let calculator = SlabCalculator::new(&schedule.brackets);
            let result = calculator
                .calculate(income, schedule.standard_deduction + totals.grand_total)?;
            print_tax_result(&result);
        }
        Command::Compare {
            schedule,
            income,
            deductions,
        } => {
            let old = load_schedule(&schedule, "old")?;
            let new = load_schedule(&schedule, "new")?;
            let totals = aggregate_deductions(&deductions, old.fiscal_year)?;
            let comparison = RegimeComparator::new(&old, &new).compare(income, &totals)?;
            println!("Old regime total tax: {}", comparison.old.result.total_tax);
            println!("New regime total tax: {}", comparison.new.result.total_tax);
            println!(
                "Recommendation: {} regime (saves {})",
                comparison.recommended, comparison.savings
            );
        }
        Command::Gains {
            asset_class,
            cost,
            proceeds,
            acquired,
            disposed,
        } => {
            let event = DisposalEvent {
                asset_class: asset_class_from_code(&asset_class)?,
                acquisition_price: cost,
                disposal_price: proceeds,
                acquisition_date: acquired,
                disposal_date: disposed,
            };
            let result = CapitalGainsClassifier::default().classify(&event)?;
            println!(
                "{} held {} months: {}-term",
                result.asset_class,
                result.holding_months,
                if result.is_long_term { "long" } else { "short" }
            );
            println!("Gain: {}", result.gain);
            println!("Exemption applied: {}", result.exemption_applied);
            println!(
                "Taxable gain {} at {}%: tax {}",
                result.taxable_gain, result.rate, result.tax_amount
            );
        }
        Command::AdvanceTax {
            schedule,
            regime,
            income,
            deductions,
            tds,
        } => {
            let schedule = load_schedule(&schedule, &regime)?;
            let totals = aggregate_deductions(&deductions, schedule.fiscal_year)?;
            let calculator = SlabCalculator::new(&schedule.brackets);
            let result = calculator
                .calculate(income, schedule.standard_deduction + totals.grand_total)?;
            let plan =
                AdvanceTaxScheduler::schedule(result.total_tax, tds, schedule.fiscal_year);
            println!(
                "Total liability {}, TDS {}, net payable {}",
                plan.total_liability, plan.tds_already_paid, plan.net_payable
            );
            if !plan.required {
                println!("Advance tax not required.");
                return Ok(());
            }
            for installment in &plan.installments {
                println!(
                    "{} due {}: cumulative {} ({}%), pay {}",
                    installment.quarter_label,
                    installment.due_date,
                    installment.cumulative_amount_due,
                    installment.cumulative_percentage,
                    installment.incremental_amount_due,
                );
            }
        }
        Command::ProjectYear {
            schedule,
            regime,
            as_of,
            income_to_date,
            deductions,
        } => {
            let schedule = load_schedule(&schedule, &regime)?;
            let totals = aggregate_deductions(&deductions, schedule.fiscal_year)?;
            let engine = ProjectionEngine::new(&schedule);
            let projection = engine.project_in_year(&InYearProjectionInput {
                fiscal_year: schedule.fiscal_year,
                as_of,
                income_to_date,
                deductions_to_date: totals,
            })?;
            println!(
                "{} months elapsed, {} remaining",
                projection.months_elapsed, projection.remaining_months
            );
            println!("Projected income: {}", projection.projected_income);
            println!("Projected tax: {}", projection.projected_tax.total_tax);
            println!(
                "Deduction headroom {} -> invest {}/month, potential savings {}",
                projection.remaining_deduction_headroom,
                projection.monthly_investment_recommendation,
                projection.potential_savings,
            );
        }
        Command::ProjectMulti {
            schedule,
            regime,
            income,
            base_deductions,
            years,
            growth,
        } => {
            let schedule = load_schedule(&schedule, &regime)?;
            let engine = ProjectionEngine::new(&schedule);
            let projection = engine.project_multi_year(&MultiYearProjectionInput {
                base_fiscal_year: schedule.fiscal_year,
                base_income: income,
                base_deductions,
                years,
                annual_growth_rate_pct: growth,
            })?;
            for period in &projection.periods {
                println!(
                    "{}: income {}, deductions {}, tax {} ({}%)",
                    period.period_label,
                    period.income,
                    period.deductions,
                    period.tax,
                    period.effective_rate,
                );
            }
            println!(
                "Totals: income {}, tax {}, average effective rate {}%",
                projection.total_income, projection.total_tax, projection.average_effective_rate
            );
        }
    }

    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

fn load_schedule(args: &ScheduleArgs, regime: &str) -> Result<RegimeSchedule> {
    let Some(regime) = TaxRegime::parse(regime) else {
        bail!("unknown regime code: {regime}");
    };

    let brackets_file = File::open(&args.brackets)
        .with_context(|| format!("Failed to open: {}", args.brackets.display()))?;
    let brackets = ScheduleLoader::parse_brackets(brackets_file)
        .with_context(|| format!("Failed to parse CSV: {}", args.brackets.display()))?;

    let deductions_file = File::open(&args.standard_deductions)
        .with_context(|| format!("Failed to open: {}", args.standard_deductions.display()))?;
    let deductions = ScheduleLoader::parse_standard_deductions(deductions_file)
        .with_context(|| format!("Failed to parse CSV: {}", args.standard_deductions.display()))?;

    let fiscal_year = FiscalYear::new(args.fiscal_year);
    let schedule = ScheduleLoader::build_schedule(&brackets, &deductions, fiscal_year, regime)
        .with_context(|| format!("Invalid schedule for {regime} regime, {}", fiscal_year.label()))?;
    debug!(
        regime = %schedule.regime,
        brackets = schedule.brackets.len(),
        "schedule loaded"
    );

    Ok(schedule)
}

/// Parses repeated `SECTION=AMOUNT` specs into aggregated deduction totals.
fn aggregate_deductions(specs: &[String], fiscal_year: FiscalYear) -> Result<DeductionTotals> {
    let mut entries = Vec::with_capacity(specs.len());

    for spec in specs {
        let Some((code, amount)) = spec.split_once('=') else {
            bail!("deduction must be SECTION=AMOUNT, got: {spec}");
        };
        let Some(section) = DeductionSection::parse(code.trim()) else {
            bail!("unknown deduction section: {code}");
        };
        let amount: Decimal = amount
            .trim()
            .parse()
            .with_context(|| format!("invalid deduction amount in: {spec}"))?;
        entries.push(DeductionEntry {
            section,
            amount,
            fiscal_year,
        });
    }

    Ok(DeductionAggregator::aggregate(&entries, fiscal_year))
}

fn print_tax_result(result: &TaxResult) {
    println!("Gross income: {}", result.gross_income);
    println!("Taxable income: {}", result.taxable_income);
    for entry in &result.bracket_breakdown {
        let upper = entry
            .upper_bound
            .map(|u| u.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{} .. {}] @ {}%: {} -> {}",
            entry.lower_bound, upper, entry.rate, entry.taxable_portion, entry.tax_in_bracket
        );
    }
    println!("Base tax: {}", result.base_tax);
    println!("Cess: {}", result.cess);
    println!("Total tax: {}", result.total_tax);
    println!("Effective rate: {}%", result.effective_rate);
}
