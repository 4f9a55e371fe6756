use serde::{Deserialize, Serialize};

// Constants

// Tolerances
pub const DEFAULT_RELATIVE_EPSILON: f64 = 1e-5; // Scaled by volume^(1/3) once per reduction
pub const ANGLE_TOLERANCE_DEGREES: f64 = 1e-6; // For validating and comparing cell angles
pub const MIN_RELATIVE_METRIC_DETERMINANT: f64 = 1e-12; // det(G) / (g11 g22 g33) at or below this is a flat cell

// Iteration budgets
pub const DEFAULT_ITERATION_LIMIT: usize = 1000; // Elementary actions per Niggli reduction
pub const DEFAULT_EXPECTED_CYCLE_LIMIT: usize = 2; // Recurrences tolerated before canonicalizing
pub const MINIMUM_REDUCTION_ITERATION_LIMIT: usize = 100; // step() calls per minimum reduction

/// Knobs shared by the reduction entry points and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionConfig {
    pub relative_epsilon: f64,
    pub iteration_limit: usize,
    pub expected_cycle_limit: usize,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            relative_epsilon: DEFAULT_RELATIVE_EPSILON,
            iteration_limit: DEFAULT_ITERATION_LIMIT,
            expected_cycle_limit: DEFAULT_EXPECTED_CYCLE_LIMIT,
        }
    }
}

impl ReductionConfig {
    /// Defaults for the bounded minimum reduction.
    pub fn minimum() -> Self {
        Self {
            iteration_limit: MINIMUM_REDUCTION_ITERATION_LIMIT,
            ..Self::default()
        }
    }
}
