use serde::{Deserialize, Serialize};

use crate::error::ReductionError;
use crate::interfaces::Termination;
use crate::lattice::{ChangeOfBasis, UnitCell};
use crate::reduction::metric_state::MetricState;
use crate::Result;

/// Outcome of a successful reduction call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReductionResult {
    state: MetricState,
    n_actions: usize,
    n_steps: usize,
    termination: Termination,
}

impl ReductionResult {
    pub(crate) fn new(
        state: MetricState,
        n_actions: usize,
        n_steps: usize,
        termination: Termination,
    ) -> Self {
        ReductionResult {
            state,
            n_actions,
            n_steps,
            termination,
        }
    }

    pub fn state(&self) -> &MetricState {
        &self.state
    }

    /// Reduced `(A, B, C, D, E, F)`.
    pub fn values(&self) -> [f64; 6] {
        self.state.values()
    }

    /// Maps the input basis onto the reduced basis (columns are the new vectors).
    pub fn change_of_basis(&self) -> &ChangeOfBasis {
        self.state.change_of_basis()
    }

    /// Maps the reduced basis back onto the input basis.
    pub fn inverse_change_of_basis(&self) -> Result<ChangeOfBasis> {
        self.change_of_basis()
            .inverse()
            .ok_or_else(|| ReductionError::InternalInconsistency {
                action: "inverse",
                detail: format!(
                    "accumulated change of basis {} is not unimodular",
                    self.change_of_basis()
                ),
            })
    }

    pub fn as_unit_cell(&self) -> Result<UnitCell> {
        self.state.to_unit_cell()
    }

    /// Number of non-trivial elementary actions applied.
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// Number of `step()` calls, including the terminal one.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}
