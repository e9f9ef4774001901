//! Tax calculation modules for the personal income-tax engine.
//!
//! Every calculator here is a pure function of its explicit inputs: no
//! retained state, no I/O, no ambient clock. Statutory tables and
//! constants arrive as read-only parameters.

pub mod advance_tax;
pub mod capital_gains;
pub mod common;
pub mod deductions;
pub mod projection;
pub mod regime;
pub mod slab;

pub use advance_tax::{
    ADVANCE_TAX_THRESHOLD, AdvanceTaxSchedule, AdvanceTaxScheduler, CUMULATIVE_PERCENTAGES,
    Installment,
};
pub use capital_gains::{
    CapitalGainResult, CapitalGainsClassifier, CapitalGainsConfig, CapitalGainsError,
    EQUITY_LT_EXEMPTION, STCG_SLAB_APPROX_RATE, asset_class_from_code,
};
pub use deductions::{DeductionAggregator, DeductionTotals, SectionTotal};
pub use projection::{
    DEDUCTION_GROWTH_CAP_PCT, InYearProjection, InYearProjectionInput, MultiYearProjection,
    MultiYearProjectionInput, ProjectedPeriod, ProjectionEngine,
};
pub use regime::{RegimeComparator, RegimeComparison, RegimeTaxSummary, TIE_BREAK_REGIME};
pub use slab::{BracketTax, CESS_RATE, SlabCalculator, SlabError, TaxResult};
