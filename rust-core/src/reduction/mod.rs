//! Reduction module: Křivý–Gruber Niggli reduction and its bounded-cycle variant.
//!
//! Quick reference
//! - Entry points: [`niggli_reduction`], [`minimum_reduction`], [`reduce_batch`]
//! - Predicates: [`is_buerger_cell`], [`is_niggli_cell`]
//! - Building blocks: [`ToleranceComparator`], [`MetricState`], [`ReductionEngine`], [`MinimalReductionTracker`]

// ======================== MODULE DECLARATIONS ========================
pub mod batch;
pub mod krivy_gruber;
pub mod metric_state;
pub mod minimum_reduction;
pub mod reduction_result;
pub mod tolerance;
pub mod unit_cell_adapter;

mod _tests_minimum_reduction;

// ======================== TOLERANCE ========================
pub use tolerance::ToleranceComparator;
// ToleranceComparator impl methods:
//   with_epsilon(epsilon: f64) -> Self
//   for_cell(cell: &UnitCell, relative_epsilon: Option<f64>) -> Self - epsilon = volume^(1/3) * relative_epsilon
//   lt / gt / eq(&self, x: f64, y: f64) -> bool                     - exactly one holds for any pair
//   sign_counts(&self, values: [f64; 3]) -> (usize, usize)          - (zero, positive)

// ======================== STATE & RESULTS ========================
pub use metric_state::MetricState;
pub use reduction_result::ReductionResult;

// ======================== ENGINE ========================
pub use krivy_gruber::{
    ReductionEngine,        // struct - step() / step_with(hook) / run(iteration_limit)
    niggli_reduction,       // fn(cell, relative_epsilon: Option<f64>, iteration_limit: Option<usize>) -> Result<ReductionResult>
    niggli_reduction_with,  // fn(cell, config: &ReductionConfig) -> Result<ReductionResult>
};

pub use minimum_reduction::{
    MinimalReductionTracker, // struct - ReductionHook that detects and resolves cycling
    minimum_reduction,       // fn(cell, expected_cycle_limit: Option<usize>, iteration_limit: Option<usize>) -> Result<ReductionResult>
    minimum_reduction_with,  // fn(cell, config: &ReductionConfig) -> Result<ReductionResult>
};

// ======================== ADAPTER & PREDICATES ========================
pub use unit_cell_adapter::{is_buerger_cell, is_niggli_cell, to_metric_state, to_unit_cell};

// ======================== BATCHES ========================
pub use batch::{ReductionMode, reduce, reduce_batch};
